//! Handle type for drawing objects
//!
//! Handles are unique identifiers for every entity and named object in a
//! document. On the wire they are uppercase hexadecimal strings.

use std::fmt;

/// A unique identifier for drawing objects
///
/// Handle 0 is reserved and means "no object". Weak references between
/// entities (reactors, clip outlines, leader annotations) are stored as
/// handles and looked up on demand; a handle with no live target is
/// treated as absent.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Handle(u64);

impl Handle {
    /// The null/invalid handle (0)
    pub const NULL: Handle = Handle(0);

    /// Create a new handle from a u64 value
    #[inline]
    pub const fn new(value: u64) -> Self {
        Handle(value)
    }

    /// Get the raw u64 value
    #[inline]
    pub const fn value(&self) -> u64 {
        self.0
    }

    /// Check if this is a null/invalid handle
    #[inline]
    pub const fn is_null(&self) -> bool {
        self.0 == 0
    }

    /// Check if this is a valid handle
    #[inline]
    pub const fn is_valid(&self) -> bool {
        self.0 != 0
    }

    /// Parse a hexadecimal handle token as found after group codes 5/105/330/340...
    pub fn parse_hex(token: &str) -> Option<Self> {
        u64::from_str_radix(token.trim(), 16).ok().map(Handle)
    }

    /// Uppercase hexadecimal form without prefix, as written to the stream.
    pub fn to_hex(&self) -> String {
        format!("{:X}", self.0)
    }
}

impl Default for Handle {
    fn default() -> Self {
        Handle::NULL
    }
}

impl From<u64> for Handle {
    fn from(value: u64) -> Self {
        Handle(value)
    }
}

impl From<Handle> for u64 {
    fn from(handle: Handle) -> Self {
        handle.0
    }
}

impl fmt::Display for Handle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:#X}", self.0)
    }
}

impl fmt::LowerHex for Handle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::LowerHex::fmt(&self.0, f)
    }
}

impl fmt::UpperHex for Handle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::UpperHex::fmt(&self.0, f)
    }
}

/// Monotonic handle source.
///
/// `allocate` pre-increments, so a seed created with `starting_after(n)`
/// hands out `n + 1` first.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HandleSeed {
    last: u64,
}

impl HandleSeed {
    /// Seed whose first allocation is `last + 1`
    pub const fn starting_after(last: u64) -> Self {
        HandleSeed { last }
    }

    /// Allocate the next handle
    pub fn allocate(&mut self) -> Handle {
        self.last += 1;
        Handle(self.last)
    }

    /// Last handle handed out (or the starting value)
    pub fn last(&self) -> u64 {
        self.last
    }

    /// Value the next allocation will return
    pub fn peek(&self) -> u64 {
        self.last + 1
    }

    /// Make sure later allocations stay above `handle`.
    pub fn observe(&mut self, handle: Handle) {
        if handle.0 > self.last {
            self.last = handle.0;
        }
    }
}

impl Default for HandleSeed {
    fn default() -> Self {
        HandleSeed::starting_after(0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_handle_creation() {
        let handle = Handle::new(0x1234);
        assert_eq!(handle.value(), 0x1234);
    }

    #[test]
    fn test_null_handle() {
        let null = Handle::NULL;
        assert!(null.is_null());
        assert!(!null.is_valid());
        assert_eq!(null.value(), 0);
    }

    #[test]
    fn test_handle_display() {
        let handle = Handle::new(0xABCD);
        assert_eq!(format!("{}", handle), "0xABCD");
        assert_eq!(format!("{:X}", handle), "ABCD");
        assert_eq!(handle.to_hex(), "ABCD");
    }

    #[test]
    fn test_parse_hex() {
        assert_eq!(Handle::parse_hex("2711"), Some(Handle::new(10001)));
        assert_eq!(Handle::parse_hex(" 1f "), Some(Handle::new(0x1F)));
        assert_eq!(Handle::parse_hex("zz"), None);
    }

    #[test]
    fn test_seed_pre_increments() {
        let mut seed = HandleSeed::starting_after(10000);
        assert_eq!(seed.allocate(), Handle::new(10001));
        assert_eq!(seed.allocate(), Handle::new(10002));
        assert_eq!(seed.last(), 10002);
    }

    #[test]
    fn test_seed_observe() {
        let mut seed = HandleSeed::default();
        seed.observe(Handle::new(0x40));
        assert_eq!(seed.allocate(), Handle::new(0x41));
        seed.observe(Handle::new(3));
        assert_eq!(seed.peek(), 0x42);
    }
}
