use alloy::primitives::{Address, B256};

fn shorten(s: &str) -> String {
    if s.len() > 14 {
        format!("{}...{}", &s[..8], &s[s.len() - 4..])
    } else {
        s.to_string()
    }
}

/// Truncate a B256 hash to "0xabcdef...ef12" format
pub fn truncate_hash(hash: &B256) -> String {
    shorten(&format!("{hash}"))
}

/// Truncate an address to "0xabcdef...ef12" format
pub fn truncate_address(addr: &Address) -> String {
    shorten(&format!("{addr}"))
}

/// Terminal coordinate `n` cells past `base`, saturating at the edge of `u16`.
pub fn cell_offset(base: u16, n: usize) -> u16 {
    base.saturating_add(u16::try_from(n).unwrap_or(u16::MAX))
}
