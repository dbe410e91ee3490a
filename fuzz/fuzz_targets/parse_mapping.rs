#![no_main]

use libfuzzer_sys::fuzz_target;
use taxon_core::{Converter, RelationMapping};

fuzz_target!(|data: &[u8]| {
    let Ok(json) = std::str::from_utf8(data) else {
        return;
    };
    let Ok(mapping) = RelationMapping::from_json(json) else {
        return;
    };
    if let Ok(rendering) = Converter::default().mapping_to_text(&mapping) {
        assert!(rendering.rows.len() >= mapping.len());
    }

    let encoded = serde_json::to_string(&mapping).expect("mapping serializes");
    let decoded = RelationMapping::from_json(&encoded).expect("own output parses");
    assert_eq!(decoded, mapping);
});
