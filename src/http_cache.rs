use std::collections::HashMap;
use std::fmt;
use std::fs;
use std::path::PathBuf;
use std::sync::{Mutex, PoisonError};
use std::time::{SystemTime, UNIX_EPOCH};

use anyhow::{Context, Result};
use reqwest::StatusCode;
use reqwest::blocking::Client;
use reqwest::header::{ACCEPT, ETAG, IF_MODIFIED_SINCE, IF_NONE_MATCH, LAST_MODIFIED};
use serde::{Deserialize, Serialize};

const CACHE_VERSION: u32 = 1;
const CACHE_DIR: &str = "fpl_h2h_terminal";
const CACHE_FILE: &str = "http_cache.json";
/// Upper bound on cached URLs, oldest evicted first.
const MAX_ENTRIES: usize = 2_000;

static CACHE: Mutex<Option<HttpCacheFile>> = Mutex::new(None);

/// Non-success response from the remote API.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HttpStatusError {
    pub status: u16,
}

impl fmt::Display for HttpStatusError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "HTTP error! status: {}", self.status)
    }
}

impl std::error::Error for HttpStatusError {}

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
struct HttpCacheFile {
    version: u32,
    entries: HashMap<String, CacheEntry>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
struct CacheEntry {
    body: String,
    etag: Option<String>,
    last_modified: Option<String>,
    fetched_at: u64,
}

/// GET `url` and return the body. With `use_cache`, a previous body is revalidated
/// with its validators and reused on 304.
pub fn fetch_json(client: &Client, url: &str, use_cache: bool) -> Result<String> {
    let cached_entry = if use_cache {
        let mut guard = CACHE.lock().unwrap_or_else(PoisonError::into_inner);
        let cache = guard.get_or_insert_with(load_cache_file);
        cache.entries.get(url).cloned()
    } else {
        None
    };

    let mut req = client.get(url).header(ACCEPT, "application/json");
    if let Some(entry) = cached_entry.as_ref() {
        if let Some(etag) = entry.etag.as_ref() {
            req = req.header(IF_NONE_MATCH, etag);
        }
        if let Some(last_modified) = entry.last_modified.as_ref() {
            req = req.header(IF_MODIFIED_SINCE, last_modified);
        }
    }

    let resp = req.send().context("request failed")?;
    let status = resp.status();
    let headers = resp.headers().clone();
    if status == StatusCode::NOT_MODIFIED {
        if let Some(entry) = cached_entry {
            let entry = revalidated(entry, SystemTime::now());
            refresh_cache_entry(url, entry.clone());
            return Ok(entry.body);
        }
        return Err(anyhow::anyhow!("received 304 without cache body"));
    }
    if !status.is_success() {
        return Err(HttpStatusError {
            status: status.as_u16(),
        }
        .into());
    }

    let body = resp.text().context("failed reading body")?;
    if !use_cache {
        return Ok(body);
    }

    let etag = headers
        .get(ETAG)
        .and_then(|v| v.to_str().ok())
        .map(|v| v.to_string());
    let last_modified = headers
        .get(LAST_MODIFIED)
        .and_then(|v| v.to_str().ok())
        .map(|v| v.to_string());
    if etag.is_some() || last_modified.is_some() {
        let entry = CacheEntry {
            body: body.clone(),
            etag,
            last_modified,
            fetched_at: system_time_to_secs(SystemTime::now()).unwrap_or_default(),
        };
        refresh_cache_entry(url, entry);
    }
    Ok(body)
}

fn refresh_cache_entry(key: &str, entry: CacheEntry) {
    let mut guard = CACHE.lock().unwrap_or_else(PoisonError::into_inner);
    let cache = guard.get_or_insert_with(load_cache_file);
    cache.version = CACHE_VERSION;
    cache.entries.insert(key.to_string(), entry);
    prune_oldest(&mut cache.entries, MAX_ENTRIES);
    let _ = save_cache_file(cache);
}

/// A 304 confirms the stored body, so it counts as freshly fetched.
fn revalidated(mut entry: CacheEntry, now: SystemTime) -> CacheEntry {
    entry.fetched_at = system_time_to_secs(now).unwrap_or(entry.fetched_at);
    entry
}

fn prune_oldest(entries: &mut HashMap<String, CacheEntry>, max: usize) {
    if entries.len() <= max {
        return;
    }
    let mut by_age: Vec<(u64, String)> = entries
        .iter()
        .map(|(url, entry)| (entry.fetched_at, url.clone()))
        .collect();
    by_age.sort();
    let excess = entries.len() - max;
    for (_, url) in by_age.into_iter().take(excess) {
        entries.remove(&url);
    }
}

fn load_cache_file() -> HttpCacheFile {
    let Some(path) = cache_path() else {
        return HttpCacheFile::default();
    };
    let Ok(raw) = fs::read_to_string(path) else {
        return HttpCacheFile::default();
    };
    let cache = serde_json::from_str::<HttpCacheFile>(&raw).unwrap_or_default();
    if cache.version != CACHE_VERSION {
        return HttpCacheFile::default();
    }
    cache
}

fn save_cache_file(cache: &HttpCacheFile) -> Result<()> {
    let Some(path) = cache_path() else {
        return Ok(());
    };
    let Some(dir) = path.parent() else {
        return Ok(());
    };
    fs::create_dir_all(dir).ok();
    let tmp = path.with_extension("json.tmp");
    let json = serde_json::to_string(cache).context("serialize http cache")?;
    fs::write(&tmp, json).context("write http cache")?;
    fs::rename(&tmp, &path).context("swap http cache")?;
    Ok(())
}

fn cache_path() -> Option<PathBuf> {
    if let Ok(base) = std::env::var("XDG_CACHE_HOME")
        && !base.trim().is_empty()
    {
        return Some(PathBuf::from(base).join(CACHE_DIR).join(CACHE_FILE));
    }
    let home = std::env::var("HOME").ok()?;
    if home.trim().is_empty() {
        return None;
    }
    Some(PathBuf::from(home).join(".cache").join(CACHE_DIR).join(CACHE_FILE))
}

fn system_time_to_secs(time: SystemTime) -> Option<u64> {
    time.duration_since(UNIX_EPOCH).ok().map(|d| d.as_secs())
}
