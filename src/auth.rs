//! Caller identity checks between the protocol's own contracts.
//!
//! On Casper 2.0 a contract may observe its peer either as a package or as
//! an entity address, so a plain `==` can reject a legitimate vault call.

use alloc::string::String;
use alloc::vec::Vec;
use odra::prelude::*;

/// Pull the first 64-char hex run out of an address' debug form.
fn extract_hash_hex(debug_str: &str) -> Option<String> {
    let chars: Vec<char> = debug_str.chars().collect();
    for i in 0..chars.len().saturating_sub(63) {
        let slice: String = chars[i..i + 64].iter().collect();
        if slice.chars().all(|c| c.is_ascii_hexdigit()) {
            return Some(slice.to_lowercase());
        }
    }
    None
}

/// True if `caller` is `expected`, allowing package/entity aliasing.
pub fn is_same_party(expected: &Address, caller: &Address) -> bool {
    if expected == caller {
        return true;
    }
    if let (Some(a), Some(b)) = (
        expected.as_contract_package_hash(),
        caller.as_contract_package_hash(),
    ) {
        return a == b;
    }
    let a = extract_hash_hex(&format!("{:?}", expected));
    a.is_some() && a == extract_hash_hex(&format!("{:?}", caller))
}

/// True if `caller` is the bound controller (vault or minter).
pub fn is_controller(controller: Option<Address>, caller: &Address) -> bool {
    match controller {
        Some(c) => is_same_party(&c, caller),
        None => false,
    }
}
