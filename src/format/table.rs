//! Precomputed tag classification tables.
//!
//! Both tables are generated at compile time from [`classify_direct`], so
//! the table and direct strategies cannot disagree. The 256-entry table
//! covers the whole byte range; the 32-entry table covers only the
//! non-fixed range `0xC0..=0xDF` and composes with prefix checks for the
//! five fixed families.

use super::{classify_direct, marker, Kind};

#[cfg_attr(not(any(test, feature = "lookup-all")), allow(dead_code))]
static ALL: [Option<Kind>; 256] = build_all();

#[cfg_attr(
    not(any(test, all(feature = "lookup-small", not(feature = "lookup-all")))),
    allow(dead_code)
)]
static SMALL: [Option<Kind>; 32] = build_small();

const fn build_all() -> [Option<Kind>; 256] {
    let mut t = [None; 256];
    let mut b = 0usize;
    while b < 256 {
        t[b] = classify_direct(b as u8);
        b += 1;
    }
    t
}

const fn build_small() -> [Option<Kind>; 32] {
    let mut t = [None; 32];
    let mut b = 0usize;
    while b < 32 {
        t[b] = classify_direct(0xC0 + b as u8);
        b += 1;
    }
    t
}

#[cfg_attr(not(any(test, feature = "lookup-all")), allow(dead_code))]
#[inline]
pub(super) fn classify_all(tag: u8) -> Option<Kind> {
    ALL[tag as usize]
}

#[cfg_attr(
    not(any(test, all(feature = "lookup-small", not(feature = "lookup-all")))),
    allow(dead_code)
)]
#[inline]
pub(super) fn classify_small(tag: u8) -> Option<Kind> {
    if tag <= marker::POS_FIXINT_MAX {
        return Some(Kind::PosFixInt(tag));
    }
    if tag & marker::PREFIX3_MASK == marker::NEG_FIXINT_PREFIX {
        return Some(Kind::NegFixInt(tag as i8));
    }
    if tag & marker::PREFIX3_MASK == marker::FIXSTR_PREFIX {
        return Some(Kind::FixStr(tag & marker::FIXSTR_LEN_MASK));
    }
    if tag & marker::NIBBLE_MASK == marker::FIXMAP_PREFIX {
        return Some(Kind::FixMap(tag & marker::FIX_LEN_MASK));
    }
    if tag & marker::NIBBLE_MASK == marker::FIXARRAY_PREFIX {
        return Some(Kind::FixArray(tag & marker::FIX_LEN_MASK));
    }
    SMALL[(tag - marker::NIL) as usize]
}
