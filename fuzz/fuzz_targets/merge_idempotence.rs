#![no_main]

// Harness: merge_idempotence
// Strategy: arbitrary writes into a fact map, then merge the same namespace twice;
// the second merge must promote nothing and leave the global tier unchanged.

use libfuzzer_sys::fuzz_target;
use cando_core::registry::FactMap;
use cando_core::Namespace;

fuzz_target!(|writes: Vec<(u8, u8, Vec<u16>)>| {
    let mut map: FactMap<u8, u16> = FactMap::new("fuzz");
    for (n, key, values) in writes {
        map.write(&Namespace::from(format!("ns{}", n % 4)), key, values);
    }
    for n in 0..4 {
        let ns = Namespace::from(format!("ns{}", n));
        map.merge_to_global(&ns);
        let first = map.global().clone();
        assert_eq!(map.merge_to_global(&ns), 0);
        assert_eq!(map.global(), &first);
    }
});
