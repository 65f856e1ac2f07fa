#![no_main]

use inox::parser::{ParserOptions, parse_chunk};
use inox::print::{PrintConfig, sprint};
use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    // Inox modules are UTF-8 text
    let Ok(code) = std::str::from_utf8(data) else {
        return;
    };

    // Syntax errors are expected, panics are not
    if let Ok(root) = parse_chunk(code, "fuzz.ix", &ParserOptions::default()) {
        let printed = sprint(root.node(), root.chunk(), PrintConfig::default());
        assert_eq!(printed.chars().count(), root.node().span().len());
    }
});
