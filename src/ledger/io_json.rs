// JSON summaries, reference checks and the combined file.

use serde::Serialize;
use serde_json::Map as JSMap;
use serde_json::Value as JSValue;
use text_diff::print_diff;

use crate::ledger::*;

pub const COMBINED_FILE_NAME: &str = "combined.json";

/// Writes the summaries as a pretty-printed JSON array and returns them as a JSON value.
pub fn write_json<T: Serialize>(summaries: &[T], path: &Path) -> PipelineResult<JSValue> {
    let pretty = serde_json::to_string_pretty(summaries).context(SerializingJsonSnafu {})?;
    fs::write(path, pretty).context(WritingFileSnafu {
        path: path.display().to_string(),
    })?;
    serde_json::to_value(summaries).context(SerializingJsonSnafu {})
}

/// Compares a summary with a reference file. A missing reference is not a difference.
pub fn check_reference(summary: &JSValue, reference: &Path) -> PipelineResult<bool> {
    if !reference.is_file() {
        info!("No reference summary at {}", reference.display());
        return Ok(true);
    }
    let path = reference.display().to_string();
    let contents = fs::read_to_string(reference).context(ReadingFileSnafu { path: path.clone() })?;
    let summary_ref: JSValue =
        serde_json::from_str(&contents).context(ParsingJsonSnafu { path: path.clone() })?;

    // Both sides go through the same printer so that only the content matters.
    let pretty_js_summary_ref =
        serde_json::to_string_pretty(&summary_ref).context(SerializingJsonSnafu {})?;
    let pretty_js_summary =
        serde_json::to_string_pretty(summary).context(SerializingJsonSnafu {})?;
    if pretty_js_summary_ref != pretty_js_summary {
        warn!("Found differences with the reference {}", path);
        print_diff(
            pretty_js_summary_ref.as_str(),
            pretty_js_summary.as_str(),
            "\n",
        );
        return Ok(false);
    }
    debug!("Summary matches the reference {}", path);
    Ok(true)
}

/// Gathers all the JSON summaries of a directory into `combined.json`, keyed by
/// the file name up to its first dot.
pub fn combine_outputs(dir: &Path) -> PipelineResult<PathBuf> {
    let mut combined: JSMap<String, JSValue> = JSMap::new();
    for path in list_entries(dir)? {
        let name = simplify_file_name(&path);
        if !path.is_file() || !name.ends_with(".json") || name == COMBINED_FILE_NAME {
            continue;
        }
        let key = name.split('.').next().unwrap_or_default().to_string();
        let p = path.display().to_string();
        let js = fs::read_to_string(&path)
            .context(ReadingFileSnafu { path: p.clone() })
            .and_then(|contents| {
                serde_json::from_str::<JSValue>(&contents).context(ParsingJsonSnafu { path: p })
            });
        match js {
            Ok(js) => {
                debug!("combine_outputs: adding {} as {:?}", name, key);
                combined.insert(key, js);
            }
            Err(e) => warn!("Skipping {} in the combined file: {}", name, e),
        }
    }

    let out = dir.join(COMBINED_FILE_NAME);
    let contents =
        serde_json::to_string(&JSValue::Object(combined)).context(SerializingJsonSnafu {})?;
    fs::write(&out, contents).context(WritingFileSnafu {
        path: out.display().to_string(),
    })?;
    Ok(out)
}
