/// DDL for every table in the persistent store, executed once when a
/// storage location is created. Table shapes follow the on-disk schema of
/// the system this crate's design is transcribed from fairly closely:
/// integer surrogate keys for fields and terms so that posting-list joins
/// are integer-integer, and `without rowid` on the two posting tables to
/// keep them physically stored in (term, frame) / (frame, term) order.
pub const CREATE_SCHEMA: &str = r#"
pragma journal_mode = WAL;

create table if not exists field (
    id integer primary key,
    name text unique not null,
    kind text not null,
    indexed integer not null,
    stored integer not null,
    analyzer text
);

create table if not exists vocabulary (
    id integer primary key,
    term text unique not null
);

create table if not exists document (
    id integer primary key,
    stored text
);

create table if not exists document_data (
    field_id integer not null,
    value,
    document_id integer not null,
    primary key (field_id, value, document_id),
    foreign key (document_id) references document(id),
    foreign key (field_id) references field(id)
);

create table if not exists frame (
    id integer primary key,
    document_id integer not null,
    field_id integer not null,
    sequence integer not null,
    stored text,
    foreign key (document_id) references document(id),
    foreign key (field_id) references field(id)
);

create index if not exists document_frame_bridge on frame(document_id, field_id);

create table if not exists term_posting (
    term_id integer not null,
    frame_id integer not null,
    frequency integer not null,
    positions text not null,
    primary key (term_id, frame_id)
) without rowid;

create table if not exists frame_posting (
    frame_id integer not null,
    term_id integer not null,
    frequency integer not null,
    positions text not null,
    primary key (frame_id, term_id)
) without rowid;

create table if not exists attribute (
    id integer primary key,
    type text not null,
    value not null,
    unique (type, value)
);

create table if not exists frame_attribute_posting (
    frame_id integer not null,
    attribute_id integer not null,
    primary key (frame_id, attribute_id)
) without rowid;

create table if not exists attribute_frame_posting (
    attribute_id integer not null,
    frame_id integer not null,
    primary key (attribute_id, frame_id)
) without rowid;

create table if not exists term_statistics (
    term_id integer not null,
    field_id integer not null,
    frequency integer not null,
    frames_occurring integer not null,
    documents_occurring integer not null,
    primary key (term_id, field_id)
);

create table if not exists field_statistics (
    field_id integer primary key,
    frame_count integer not null
);

create table if not exists plugin_registry (
    plugin_id integer primary key,
    plugin_type text not null,
    settings text not null,
    unique (plugin_type, settings)
);

create table if not exists plugin_data (
    plugin_id integer not null,
    key text not null,
    value text,
    primary key (plugin_id, key),
    foreign key (plugin_id) references plugin_registry(plugin_id) on delete cascade
);

create table if not exists setting (
    name text primary key,
    value
);

create table if not exists index_revision (
    revision_number integer primary key autoincrement,
    added_documents integer not null,
    deleted_documents integer not null,
    added_frames integer not null
);

-- Seed row so the first real commit has lifetime totals to accumulate
-- onto; `added_documents`/`deleted_documents`/`added_frames` are running
-- counters over the index's whole history, not per-commit deltas.
insert or ignore into index_revision(revision_number, added_documents, deleted_documents, added_frames)
    values (0, 0, 0, 0);
"#;
