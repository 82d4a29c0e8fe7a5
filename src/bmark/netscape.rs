//! Netscape bookmark HTML interchange and the dedupe merge planner.
//!
//! The export mirrors each record's folder segments as nested
//! `<DT><H3>` + `<DL><p>` blocks, with one `<DT><A>` anchor per record.
//! The import walks the same structure back with a folder stack keyed on
//! `<DL>`/`</DL>` nesting; heading tags may carry arbitrary attributes
//! (browsers add `ADD_DATE`, `PERSONAL_TOOLBAR_FOLDER`, ...), so only the
//! tag name is matched.

use once_cell::sync::Lazy;
use regex::Regex;
use std::collections::{BTreeMap, HashMap};
use std::path::PathBuf;

use crate::model::{to_epoch, Record};
use crate::slug::derive_id;

pub const DOCTYPE: &str = "<!DOCTYPE NETSCAPE-Bookmark-file-1>";

/// One anchor pulled out of a bookmarks file, with the folder chain that
/// enclosed it.
#[derive(Debug, Clone, PartialEq)]
pub struct ParsedBookmark {
    pub url: String,
    pub title: String,
    pub tags: Vec<String>,
    pub folder: Vec<String>,
    pub add_date: Option<i64>,
    pub last_modified: Option<i64>,
}

/// Planned merge of records sharing a normalized URL. Nothing is deleted
/// here; the caller applies the plan after confirmation.
#[derive(Debug, Clone)]
pub struct MergePlan {
    pub id: String,
    pub survivor: PathBuf,
    pub absorbed: Vec<PathBuf>,
    /// Union of the group's tags, survivor's first, insertion order kept.
    pub tags: Vec<String>,
    /// Earliest `created` in the group, verbatim.
    pub created: Option<String>,
    /// Latest `modified` in the group, verbatim.
    pub modified: Option<String>,
}

#[derive(Default)]
struct FolderNode<'a> {
    folders: BTreeMap<String, FolderNode<'a>>,
    items: Vec<&'a Record>,
}

/// Render the record set as a Netscape bookmarks file.
pub fn export(records: &[Record], root_label: &str) -> String {
    let mut root = FolderNode::default();
    for record in records {
        let mut node = &mut root;
        for segment in record.folder_segments() {
            node = node.folders.entry(segment).or_default();
        }
        node.items.push(record);
    }

    let mut out = String::new();
    out.push_str(DOCTYPE);
    out.push('\n');
    out.push_str("<!-- This is an automatically generated file. -->\n");
    out.push_str("<META HTTP-EQUIV=\"Content-Type\" CONTENT=\"text/html; charset=UTF-8\">\n");
    out.push_str("<TITLE>Bookmarks</TITLE>\n");
    out.push_str(&format!("<H1>{}</H1>\n", escape_text(root_label)));
    out.push_str("<DL><p>\n");
    render_node(&root, 1, &mut out);
    out.push_str("</DL><p>\n");
    out
}

fn render_node(node: &FolderNode, depth: usize, out: &mut String) {
    let pad = "    ".repeat(depth);
    for record in &node.items {
        let add_date = record
            .created_at()
            .map(|d| to_epoch(d).to_string())
            .unwrap_or_default();
        let mut attrs = format!(
            " HREF=\"{}\" ADD_DATE=\"{}\"",
            escape_attr(&record.header.url),
            add_date
        );
        if let Some(modified) = record.modified_at() {
            attrs.push_str(&format!(" LAST_MODIFIED=\"{}\"", to_epoch(modified)));
        }
        if !record.header.tags.is_empty() {
            attrs.push_str(&format!(
                " TAGS=\"{}\"",
                escape_attr(&record.header.tags.join(","))
            ));
        }
        let title = record
            .header
            .title
            .as_deref()
            .filter(|t| !t.is_empty())
            .unwrap_or(&record.header.url);
        out.push_str(&format!(
            "{}<DT><A{}>{}</A>\n",
            pad,
            attrs,
            escape_text(title)
        ));
    }
    for (name, child) in &node.folders {
        out.push_str(&format!("{}<DT><H3>{}</H3>\n", pad, escape_text(name)));
        out.push_str(&format!("{}<DL><p>\n", pad));
        render_node(child, depth + 1, out);
        out.push_str(&format!("{}</DL><p>\n", pad));
    }
}

static TOKEN_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?is)(<h3[^>]*>.*?</h3>)|(<a\s[^>]*>.*?</a>)|(<dl[^>]*>)|(</dl>)").unwrap()
});
static H3_INNER_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"(?is)<h3[^>]*>(.*?)</h3>").unwrap());
static A_INNER_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"(?is)<a[^>]*>(.*)</a>").unwrap());
static HREF_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r#"(?i)\bHREF\s*=\s*"([^"]*)""#).unwrap());
static ADD_DATE_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r#"(?i)\bADD_DATE\s*=\s*"([^"]*)""#).unwrap());
static LAST_MODIFIED_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r#"(?i)\bLAST_MODIFIED\s*=\s*"([^"]*)""#).unwrap());
static TAGS_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r#"(?i)\bTAGS\s*=\s*"([^"]*)""#).unwrap());
static TAG_STRIP_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"<[^>]+>").unwrap());

/// Walk a bookmarks file and pull out every anchor with its folder chain.
/// Anchors without an `HREF` are skipped; nothing aborts the scan.
pub fn import(html: &str) -> Vec<ParsedBookmark> {
    let mut stack: Vec<Option<String>> = Vec::new();
    let mut pending: Option<String> = None;
    let mut bookmarks = Vec::new();

    for caps in TOKEN_RE.captures_iter(html) {
        if let Some(h3) = caps.get(1) {
            pending = H3_INNER_RE
                .captures(h3.as_str())
                .map(|c| unescape(TAG_STRIP_RE.replace_all(&c[1], "").trim()));
        } else if let Some(anchor) = caps.get(2) {
            if let Some(mut bookmark) = parse_anchor(anchor.as_str()) {
                bookmark.folder = stack.iter().flatten().cloned().collect();
                bookmarks.push(bookmark);
            }
        } else if caps.get(3).is_some() {
            stack.push(pending.take());
        } else {
            stack.pop();
        }
    }
    bookmarks
}

fn parse_anchor(token: &str) -> Option<ParsedBookmark> {
    let url = unescape(&HREF_RE.captures(token)?[1]);
    if url.is_empty() {
        return None;
    }
    let title = A_INNER_RE
        .captures(token)
        .map(|c| unescape(TAG_STRIP_RE.replace_all(&c[1], "").trim()))
        .unwrap_or_default();
    let tags = TAGS_RE
        .captures(token)
        .map(|c| {
            unescape(&c[1])
                .split(',')
                .map(|t| t.trim().to_string())
                .filter(|t| !t.is_empty())
                .collect()
        })
        .unwrap_or_default();
    Some(ParsedBookmark {
        url,
        title,
        tags,
        folder: Vec::new(),
        add_date: capture_epoch(&ADD_DATE_RE, token),
        last_modified: capture_epoch(&LAST_MODIFIED_RE, token),
    })
}

fn capture_epoch(re: &Regex, token: &str) -> Option<i64> {
    re.captures(token)?.get(1)?.as_str().trim().parse().ok()
}

/// Group records by normalized URL and plan merges for every group with
/// more than one member. The earliest-created record survives.
pub fn dedupe_plan(records: &[Record]) -> Vec<MergePlan> {
    let mut order: Vec<String> = Vec::new();
    let mut groups: HashMap<String, Vec<&Record>> = HashMap::new();
    for record in records {
        let id = derive_id(&record.header.url);
        groups
            .entry(id.clone())
            .or_insert_with(|| {
                order.push(id.clone());
                Vec::new()
            })
            .push(record);
    }

    let mut plans = Vec::new();
    for id in order {
        let group = &groups[&id];
        if group.len() < 2 {
            continue;
        }
        let survivor_pos = group
            .iter()
            .enumerate()
            .min_by_key(|(pos, r)| {
                let stamp = r
                    .created_at()
                    .map(|d| d.timestamp())
                    .unwrap_or(i64::MAX);
                (stamp, *pos)
            })
            .map(|(pos, _)| pos)
            .unwrap_or(0);
        let survivor = group[survivor_pos];

        let mut tags: Vec<String> = Vec::new();
        for record in std::iter::once(survivor)
            .chain(group.iter().enumerate().filter(|(pos, _)| *pos != survivor_pos).map(|(_, r)| *r))
        {
            for tag in &record.header.tags {
                if !tags.contains(tag) {
                    tags.push(tag.clone());
                }
            }
        }

        let created = group
            .iter()
            .filter_map(|r| r.created_at().map(|d| (d, r.header.created.clone())))
            .min_by_key(|(d, _)| *d)
            .and_then(|(_, verbatim)| verbatim)
            .or_else(|| survivor.header.created.clone());
        let modified = group
            .iter()
            .filter_map(|r| r.modified_at().map(|d| (d, r.header.modified.clone())))
            .max_by_key(|(d, _)| *d)
            .and_then(|(_, verbatim)| verbatim);

        plans.push(MergePlan {
            id,
            survivor: survivor.path.clone(),
            absorbed: group
                .iter()
                .enumerate()
                .filter(|(pos, _)| *pos != survivor_pos)
                .map(|(_, r)| r.path.clone())
                .collect(),
            tags,
            created,
            modified,
        });
    }
    plans
}

fn escape_text(text: &str) -> String {
    text.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
}

fn escape_attr(text: &str) -> String {
    escape_text(text).replace('"', "&quot;")
}

fn unescape(text: &str) -> String {
    text.replace("&lt;", "<")
        .replace("&gt;", ">")
        .replace("&quot;", "\"")
        .replace("&#39;", "'")
        .replace("&amp;", "&")
}
