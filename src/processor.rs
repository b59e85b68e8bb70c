use crate::account::CachedLinkedBrokerAccount;
use crate::cache::AccountCache;
use crate::error::CacheError;

use std::io::Read;

use serde_json::{Deserializer, Value};

/// Loads concatenated or newline-delimited JSON payloads into the cache.
/// Top-level arrays are expanded into their elements.
#[inline]
pub fn process_json_stream(cache: &mut AccountCache, reader: impl Read) -> usize {
    let stream = Deserializer::from_reader(reader)
        .into_iter::<Value>()
        .inspect(|result: &Result<Value, serde_json::Error>| {
            if let Err(e) = result {
                log::warn!("Error parsing account payload: {}", e);
            }
        })
        .filter_map(Result::ok)
        .flat_map(|value| match value {
            Value::Array(items) => items,
            other => vec![other],
        });

    let inserted = process_stream(cache, stream);
    log::info!("Loaded {} linked accounts", inserted);
    inserted
}

#[inline]
pub fn process_stream(cache: &mut AccountCache, stream: impl Iterator<Item = Value>) -> usize {
    let mut inserted = 0;
    for payload in stream {
        match process_entry(cache, payload) {
            Ok(()) => inserted += 1,
            Err(e) => log::warn!("Skipping account payload: {}", e),
        }
    }
    inserted
}

#[inline]
fn process_entry(cache: &mut AccountCache, payload: Value) -> Result<(), CacheError> {
    let account = CachedLinkedBrokerAccount::try_from(payload)?;
    if let Some(previous) = cache.insert(account) {
        let (number, index) = previous.key();
        log::debug!("Replaced cached account {}/{}", number, index);
    }
    Ok(())
}
