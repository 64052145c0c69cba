//! Interactive line-oriented cache client.
//!
//! Issues single save/load commands against an [`LruCache`] through the
//! shared [`Cache`] contract; any of the three engines would serve equally.

use std::io::{self, BufRead, Write};

use tracing_subscriber::EnvFilter;

use tricache::{Cache, Countable, LruCache};

fn prompt(out: &mut impl Write, text: &str) -> io::Result<()> {
    writeln!(out, "{text}")?;
    out.flush()
}

fn read_line(input: &mut impl BufRead) -> io::Result<Option<String>> {
    let mut line = String::new();
    if input.read_line(&mut line)? == 0 {
        return Ok(None); // EOF
    }
    Ok(Some(line.trim_end_matches(['\r', '\n']).to_string()))
}

fn main() -> io::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    let cache: LruCache<String, String> = LruCache::new();
    let stdin = io::stdin();
    let mut input = stdin.lock();
    let mut out = io::stdout();

    loop {
        prompt(
            &mut out,
            "Enter 's' to save data to cache, 'l' to load data from cache or 'x' to exit",
        )?;
        let Some(command) = read_line(&mut input)? else {
            break;
        };
        match command.as_str() {
            "s" => {
                prompt(&mut out, "Enter cache key:")?;
                let Some(key) = read_line(&mut input)? else { break };
                prompt(&mut out, "Enter cache data:")?;
                let Some(data) = read_line(&mut input)? else { break };
                match cache.insert_or_update(key, data) {
                    Ok(()) => writeln!(out, "Saved; cache now holds {} items", cache.count())?,
                    Err(err) => writeln!(out, "Save failed: {err}")?,
                }
            }
            "l" => {
                prompt(&mut out, "Enter cache key:")?;
                let Some(key) = read_line(&mut input)? else { break };
                match cache.try_get(&key) {
                    Ok(Some(data)) => writeln!(out, "Cached data: {data}")?,
                    Ok(None) => writeln!(out, "No data found with key {key}")?,
                    Err(err) => writeln!(out, "Load failed: {err}")?,
                }
            }
            "x" => break,
            _ => writeln!(out, "Invalid command entered")?,
        }
    }
    Ok(())
}
