#![no_main]

use libfuzzer_sys::fuzz_target;

use fmuio::config;
use fmuio::filename::{build_filestem, StemParts};

fuzz_target!(|data: &[u8]| {
    // Interpret the input as text; naming takes user-controlled strings
    // and must never panic on any of them
    if let Ok(text) = std::str::from_utf8(data) {
        let mut pieces = text.splitn(3, '|');
        let name = pieces.next().unwrap_or("");
        let tagname = pieces.next().unwrap_or("");
        let parent = pieces.next().unwrap_or("");
        let _ = build_filestem(&StemParts {
            name,
            tagname,
            parent,
            ..StemParts::default()
        });

        // Global configurations come from user-maintained YAML files;
        // evaluation must reject garbage gracefully
        if let Ok(value) = serde_yaml::from_str::<serde_yaml::Value>(text) {
            let _ = config::evaluate(&value);
        }
    }
});
