use std::sync::OnceLock;

use regex::Regex;

/// Expand `{{ env.VAR }}` placeholders in a raw TOML string
///
/// An optional fallback is supported via `{{ env.VAR | default("value") }}`.
/// TOML comment lines are passed through unchanged.
pub fn expand_env(input: &str) -> Result<String, String> {
    fn re() -> &'static Regex {
        static RE: OnceLock<Regex> = OnceLock::new();
        RE.get_or_init(|| {
            Regex::new(r#"\{\{\s*env\.([A-Za-z0-9_]+)\s*(?:\|\s*default\("([^"]*)"\))?\s*\}\}"#)
                .expect("must be valid regex")
        })
    }

    let mut output = String::with_capacity(input.len());

    for (i, line) in input.lines().enumerate() {
        if i > 0 {
            output.push('\n');
        }

        if line.trim_start().starts_with('#') {
            output.push_str(line);
            continue;
        }

        let mut last_end = 0;
        for captures in re().captures_iter(line) {
            let overall = captures.get(0).expect("match always present");
            let var_name = captures.get(1).expect("group 1 always present").as_str();
            let fallback = captures.get(2).map(|m| m.as_str());

            output.push_str(&line[last_end..overall.start()]);

            match std::env::var(var_name) {
                Ok(value) => output.push_str(&value),
                Err(_) => match fallback {
                    Some(value) => output.push_str(value),
                    None => {
                        return Err(format!("environment variable not found: `{var_name}`"));
                    }
                },
            }

            last_end = overall.end();
        }

        output.push_str(&line[last_end..]);
    }

    if input.ends_with('\n') {
        output.push('\n');
    }

    Ok(output)
}
