use clap::Parser;
use colored::*;
use std::fs;
use std::path::{Path, PathBuf};
use std::process::Command as ProcessCommand;
use unicode_width::UnicodeWidthStr;

use bmark::api::{BmarkApi, ExportFormat};
use bmark::commands::{CmdMessage, CmdResult, MessageLevel};
use bmark::config::{self, StoreConfig};
use bmark::editor;
use bmark::error::{BmarkError, Result};
use bmark::frontmatter::{self, Header};
use bmark::git::GitSync;
use bmark::model::{iso_now, parse_stamp, Record, Summary};
use bmark::query::Filter;
use bmark::store::fs::FileStore;
use bmark::store::Draft;

mod args;
use args::{Cli, Commands, ExportCmd, ImportCmd, TagAction};

fn main() {
    if let Err(e) = run() {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}

struct AppContext {
    api: BmarkApi<FileStore>,
    root: PathBuf,
}

fn run() -> Result<()> {
    let cli = Cli::parse();
    let root = config::resolve_root(cli.store.as_deref());

    if let Commands::Init { git } = &cli.command {
        return handle_init(&root, *git);
    }

    let store = FileStore::new(&root);
    let store_config = StoreConfig::load(&root).unwrap_or_default();
    let mut ctx = AppContext {
        api: BmarkApi::new(store, store_config),
        root,
    };

    match cli.command {
        Commands::Init { .. } => unreachable!("handled above"),
        Commands::Add {
            url,
            name,
            tags,
            description,
            path,
            slug,
            edit,
            force,
        } => handle_add(&mut ctx, url, name, tags, description, path, slug, edit, force),
        Commands::Show { id } => handle_show(&ctx, &id),
        Commands::Open { id } => handle_open(&ctx, &id),
        Commands::List {
            tag,
            host,
            since,
            json,
            jsonl,
        } => handle_list(&ctx, tag, host, since, json, jsonl),
        Commands::Search { query, json, jsonl } => handle_search(&ctx, &query, json, jsonl),
        Commands::Edit { id } => handle_edit(&mut ctx, &id),
        Commands::Rm { id } => {
            let result = ctx.api.remove(&id)?;
            print_messages(&result.messages);
            Ok(())
        }
        Commands::Mv { src, dst, force } => {
            let result = ctx.api.relocate(&src, &dst, force)?;
            print_messages(&result.messages);
            Ok(())
        }
        Commands::Tags => {
            let result = ctx.api.tags()?;
            print_messages(&result.messages);
            if let Some(rendered) = result.rendered {
                if !rendered.is_empty() {
                    println!("{}", rendered);
                }
            }
            Ok(())
        }
        Commands::Tag { action } => {
            let result = match action {
                TagAction::Add { id, tags } => ctx.api.tag_add(&id, &tags)?,
                TagAction::Rm { id, tags } => ctx.api.tag_rm(&id, &tags)?,
            };
            print_messages(&result.messages);
            Ok(())
        }
        Commands::Export { format } => handle_export(&ctx, format),
        Commands::Import { format } => handle_import(&mut ctx, format),
        Commands::Dedupe { apply } => {
            let result = ctx.api.dedupe(apply)?;
            print_messages(&result.messages);
            Ok(())
        }
        Commands::Sync { message } => {
            let git = GitSync::new(&ctx.root);
            let result = bmark::commands::sync::run(&git, message.as_deref())?;
            print_messages(&result.messages);
            Ok(())
        }
    }
}

fn handle_init(root: &Path, git: bool) -> Result<()> {
    let store = FileStore::new(root);
    store.init()?;
    println!("Initialized store at: {}", root.display());

    let config_path = root.join("config.json");
    if !config_path.exists() {
        StoreConfig::default().save(root)?;
    }

    if git {
        let sync = GitSync::new(root);
        if sync.is_repo() {
            println!("Git repo already exists.");
        } else {
            sync.init()?;
            println!("Initialized git repository.");
        }
    }

    let readme = root.join("README.txt");
    if !readme.exists() {
        fs::write(
            &readme,
            format!(
                "bmark store\n\
                 ===========\n\
                 One bookmark per .bm file. Folders act as namespaces\n\
                 (and as tags, while folder_tags is on in config.json).\n\
                 \n\
                 File format: front matter + body notes.\n\
                 \n\
                 ---\n\
                 url: https://example.com\n\
                 title: Example\n\
                 tags:\n\
                 - sample\n\
                 - demo\n\
                 created: {}\n\
                 ---\n\
                 Freeform notes go after the second '---'.\n",
                iso_now()
            ),
        )?;
    }
    Ok(())
}

#[allow(clippy::too_many_arguments)]
fn handle_add(
    ctx: &mut AppContext,
    url: String,
    name: Option<String>,
    tags: Option<String>,
    description: Option<String>,
    path: Option<String>,
    slug: Option<String>,
    edit: bool,
    force: bool,
) -> Result<()> {
    let tags: Vec<String> = tags
        .as_deref()
        .unwrap_or_default()
        .split(',')
        .map(|t| t.trim().to_string())
        .filter(|t| !t.is_empty())
        .collect();
    let mut body = description.unwrap_or_default().trim_end().to_string();
    if !body.is_empty() {
        body.push('\n');
    }

    let mut draft = Draft {
        url: url.trim().to_string(),
        title: name.filter(|n| !n.is_empty()),
        tags,
        body,
        folder: path,
        slug,
        ..Draft::default()
    };

    if edit {
        let mut header = Header::new(draft.url.clone());
        header.title = draft.title.clone();
        header.tags = draft.tags.clone();
        header.created = Some(iso_now());
        let template = frontmatter::serialize(&header, &draft.body)?;

        let buffer = editor::edit_template(&template)?;
        let (edited, edited_body) = frontmatter::parse(&buffer)?;
        if !edited.url.trim().is_empty() {
            draft.url = edited.url.trim().to_string();
        }
        draft.title = edited.title;
        draft.tags = edited.tags;
        draft.body = edited_body;
        draft.created = edited.created;
        draft.modified = edited.modified;
    }

    let result = ctx.api.add(draft, force)?;
    print_messages(&result.messages);
    // the stable id on its own line, for scripting
    println!("{}", result.records[0].id());
    Ok(())
}

fn handle_show(ctx: &AppContext, id: &str) -> Result<()> {
    let result = ctx.api.show(id)?;
    print_record(&result.records[0]);
    Ok(())
}

fn handle_open(ctx: &AppContext, id: &str) -> Result<()> {
    let result = ctx.api.show(id)?;
    let url = &result.records[0].header.url;
    if url.is_empty() {
        return Err(BmarkError::Store("no url in entry".to_string()));
    }
    println!("{}", url);
    open_in_browser(url)
}

fn handle_list(
    ctx: &AppContext,
    tag: Option<String>,
    host: Option<String>,
    since: Option<String>,
    json: bool,
    jsonl: bool,
) -> Result<()> {
    let filter = build_filter(tag, host, since)?;
    let result = ctx.api.list(&filter)?;
    print_messages(&result.messages);
    print_summaries(&result.summaries, json, jsonl)
}

fn handle_search(ctx: &AppContext, query: &str, json: bool, jsonl: bool) -> Result<()> {
    let result = ctx.api.search(query)?;
    print_messages(&result.messages);
    print_summaries(&result.summaries, json, jsonl)
}

fn handle_edit(ctx: &mut AppContext, id: &str) -> Result<()> {
    let path = ctx.api.path_of(id)?;
    let buffer = editor::open_in_editor(&path)?;
    let (header, body) = frontmatter::parse(&buffer).map_err(|e| BmarkError::Parse {
        path: path.clone(),
        reason: e.to_string(),
    })?;
    let result = ctx.api.apply_edit(id, header, body)?;
    print_messages(&result.messages);
    Ok(())
}

fn handle_export(ctx: &AppContext, format: ExportCmd) -> Result<()> {
    let result = match format {
        ExportCmd::Netscape { host, since } => {
            let filter = build_filter(None, host, since)?;
            ctx.api.export(ExportFormat::Netscape, &filter, "Bookmarks")?
        }
        ExportCmd::Json => ctx.api.export(ExportFormat::Json, &Filter::default(), "Bookmarks")?,
    };
    print_messages(&result.messages);
    if let Some(rendered) = result.rendered {
        print!("{}", rendered);
        if !rendered.ends_with('\n') {
            println!();
        }
    }
    Ok(())
}

fn handle_import(ctx: &mut AppContext, format: ImportCmd) -> Result<()> {
    let result: CmdResult = match format {
        ImportCmd::Netscape { file, force } => {
            let html = fs::read_to_string(&file)?;
            ctx.api.import(&html, force)?
        }
    };
    print_messages(&result.messages);
    Ok(())
}

fn build_filter(tag: Option<String>, host: Option<String>, since: Option<String>) -> Result<Filter> {
    let since = match since {
        Some(raw) => Some(parse_stamp(&raw).ok_or_else(|| {
            BmarkError::Store(format!("invalid --since value: {}", raw))
        })?),
        None => None,
    };
    Ok(Filter { host, tag, since })
}

fn print_messages(messages: &[CmdMessage]) {
    for message in messages {
        match message.level {
            MessageLevel::Warning => {
                eprintln!("{} {}", "warning:".yellow(), message.content)
            }
            MessageLevel::Success => println!("{}", message.content.green()),
            MessageLevel::Info => println!("{}", message.content),
        }
    }
}

fn print_summaries(summaries: &[Summary], json: bool, jsonl: bool) -> Result<()> {
    if json {
        println!("{}", serde_json::to_string(summaries)?);
        return Ok(());
    }
    if jsonl {
        for summary in summaries {
            println!("{}", serde_json::to_string(summary)?);
        }
        return Ok(());
    }

    let width = summaries
        .iter()
        .map(|s| UnicodeWidthStr::width(s.path.as_str()))
        .max()
        .unwrap_or(0);
    for summary in summaries {
        let pad = " ".repeat(width.saturating_sub(UnicodeWidthStr::width(summary.path.as_str())));
        let mut line = format!("{}  {}{}", summary.id.cyan(), summary.path, pad);
        if !summary.title.is_empty() {
            line.push_str(&format!("  {}", summary.title));
        }
        if !summary.url.is_empty() {
            line.push_str(&format!("  {}", format!("<{}>", summary.url).dimmed()));
        }
        println!("{}", line.trim_end());
    }
    Ok(())
}

fn print_record(record: &Record) {
    println!("# {}", record.display_path());
    if !record.header.url.is_empty() {
        println!("url: {}", record.header.url);
    }
    if let Some(title) = &record.header.title {
        println!("title: {}", title);
    }
    if !record.header.tags.is_empty() {
        println!("tags: {}", record.header.tags.join(", "));
    }
    if let Some(created) = &record.header.created {
        println!("created: {}", created);
    }
    if let Some(modified) = &record.header.modified {
        println!("modified: {}", modified);
    }
    if !record.body.trim().is_empty() {
        println!("\n{}", record.body.trim_end());
    }
}

fn open_in_browser(url: &str) -> Result<()> {
    #[cfg(target_os = "macos")]
    let status = ProcessCommand::new("open").arg(url).status();
    #[cfg(target_os = "windows")]
    let status = ProcessCommand::new("cmd").args(["/C", "start", "", url]).status();
    #[cfg(all(unix, not(target_os = "macos")))]
    let status = ProcessCommand::new("xdg-open").arg(url).status();

    match status {
        Ok(code) if code.success() => Ok(()),
        Ok(_) => Err(BmarkError::Store(
            "system did not acknowledge opening the browser".to_string(),
        )),
        Err(e) => Err(BmarkError::Store(format!("failed to open browser: {}", e))),
    }
}
