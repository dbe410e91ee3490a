#![no_main]

use libfuzzer_sys::fuzz_target;
use taxon_core::{Hierarchy, Separator, cycle_basis, resolve_cycles};

fuzz_target!(|data: &[u8]| {
    let Ok(text) = std::str::from_utf8(data) else {
        return;
    };
    // First line picks the separator, the rest is the hierarchy.
    let (token, body) = text.split_once('\n').unwrap_or((" ", text));
    let Ok(separator) = Separator::indent(token) else {
        return;
    };
    let Ok(hierarchy) = Hierarchy::from_indented_text(body, &separator) else {
        return;
    };

    let resolution = resolve_cycles(&hierarchy);
    assert!(cycle_basis(&resolution.residual).is_empty());

    let lines = hierarchy.to_indented_text(&separator);
    assert!(lines.len() >= hierarchy.node_count());
});
