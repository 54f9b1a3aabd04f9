// ABOUTME: Executes one parsed fit subcommand against the record store.
// ABOUTME: Mutating commands persist before returning; a file that exists but cannot be read is an error.

use std::io::Write;

use anyhow::{Context, Result, bail};
use fit_core::fold_name;
use fit_store::{Fields, FormatVersion, Placement, Query, RecordStore};

use crate::cli::{Command, to_fields};
use crate::render;
use crate::settings::Settings;

/// Open the configured database.
///
/// A missing file yields an empty store with the default config, so the first
/// mutating command creates the file. A file that exists but does not load is
/// reported instead of being overwritten.
pub fn open_store(settings: &Settings) -> Result<RecordStore> {
    let mut store = RecordStore::new(&settings.file, settings.output_version);
    match store.load() {
        Err(e) if settings.file.exists() => {
            Err(e).with_context(|| format!("cannot read {}", settings.file.display()))
        }
        _ => Ok(store),
    }
}

pub fn run<W: Write>(command: Command, settings: &Settings, out: &mut W) -> Result<()> {
    let mut store = open_store(settings)?;

    match command {
        Command::List {
            kinds,
            status,
            parent,
            id,
            board,
            json,
        } => {
            let mut query = Query::all();
            if board {
                query = query.kinds(fit_store::BOARD_TYPES);
            } else if !kinds.is_empty() {
                query = query.kinds(kinds);
            }
            if let Some(status) = status {
                query = query.status(status);
            }
            if let Some(parent) = parent {
                query = query.parent(parent);
            }
            if let Some(id) = id {
                query = query.id(id);
            }

            if json {
                serde_json::to_writer_pretty(&mut *out, &store.query_maps(&query))?;
                writeln!(out)?;
            } else {
                render::list(out, &store.query_views(&query))?;
            }
        }

        Command::Show { id, json } => {
            let row = store
                .get(&id)
                .with_context(|| format!("no row with id {id}"))?
                .view(store.schema());
            let comments = store.query_views(&Query::comments_of(&id));
            if json {
                let value = serde_json::json!({
                    "row": row.to_map(),
                    "comments": comments.iter().map(|c| c.to_map()).collect::<Vec<_>>(),
                });
                serde_json::to_writer_pretty(&mut *out, &value)?;
                writeln!(out)?;
            } else {
                render::show(out, &row, &comments)?;
            }
        }

        Command::Add { fields } => {
            let id = store.add(&to_fields(&fields))?;
            store.persist()?;
            writeln!(out, "{id}")?;
        }

        Command::Update { id, fields } => {
            let mut fields = to_fields(&fields);
            fields.retain(|name, _| fold_name(name) != "id");
            fields.insert("Id".to_string(), id);
            store.update(&fields)?;
            store.persist()?;
        }

        Command::Save { fields } => {
            let id = store.upsert(&to_fields(&fields))?;
            store.persist()?;
            writeln!(out, "{id}")?;
        }

        Command::Comment {
            issue,
            title,
            description,
        } => {
            if store.get(&issue).is_none() {
                bail!("no row with id {issue}");
            }
            let fields = Fields::from([
                ("Type".to_string(), "Comment".to_string()),
                ("Parent".to_string(), issue),
                ("Title".to_string(), title),
                ("Description".to_string(), description),
            ]);
            let id = store.add(&fields)?;
            store.persist()?;
            writeln!(out, "{id}")?;
        }

        Command::Move { id, status, before } => {
            let placement = before.as_deref().map(Placement::from_target);
            store.move_to(&id, &status, placement.as_ref())?;
            store.persist()?;
        }

        Command::Reorder { id, before } => {
            if !store.reorder(&id, &Placement::from_target(&before)) {
                bail!("nothing moved: {id} or {before} is not a known id");
            }
            store.persist()?;
        }

        Command::Columns => {
            for name in store.columns() {
                writeln!(out, "{name}")?;
            }
        }

        Command::Config { key } => {
            for value in store.config(&key) {
                writeln!(out, "{value}")?;
            }
        }

        Command::Colors { key, json } => {
            let colors = store.color_config(&key);
            if json {
                serde_json::to_writer_pretty(&mut *out, &colors)?;
                writeln!(out)?;
            } else {
                render::pairs(out, &colors)?;
            }
        }

        Command::Dump => render::dump(out, &store)?,

        Command::Migrate { to } => migrate(&mut store, to)?,
    }

    Ok(())
}

fn migrate(store: &mut RecordStore, to: FormatVersion) -> Result<()> {
    if store.is_degraded() {
        bail!("{} does not exist, nothing to migrate", store.path().display());
    }
    let from = store.input_version();
    store.set_output_version(Some(to));
    store.persist()?;
    tracing::info!(
        "migrated {} from version {} to {}",
        store.path().display(),
        from.map(|v| v.to_string()).unwrap_or_else(|| "?".to_string()),
        to
    );
    Ok(())
}
