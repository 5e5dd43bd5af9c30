// SPDX-License-Identifier: MIT OR Apache-2.0

//! Convenience macros for building field maps and writing raw output.

/// Builds a [`Fields`](crate::Fields) map from `key => value` pairs.
///
/// Values can be anything `serde_json` can represent; pass nested
/// structures as `serde_json::json!` literals.
///
/// # Examples
///
/// ```
/// use scopewise::fields;
///
/// let fields = fields! {
///     "order_id" => "O1",
///     "amount" => 1299,
///     "customer" => serde_json::json!({ "id": 7, "tier": "gold" }),
/// };
/// assert_eq!(fields["customer"]["tier"], "gold");
/// assert!(fields!{}.is_empty());
/// ```
#[macro_export]
macro_rules! fields {
    () => { $crate::Fields::new() };
    ($($key:expr => $value:expr),+ $(,)?) => {{
        let mut map = $crate::Fields::new();
        $( map.insert(($key).into(), $crate::hidden::json!($value)); )+
        map
    }};
}

/// Writes one line of raw, unstructured output through the stream gate.
///
/// Unlike `println!`, output produced here is silenced or redirected while
/// a [`StreamGate`](crate::StreamGate) is active.
#[macro_export]
macro_rules! raw_println {
    ($($arg:tt)*) => {
        $crate::stream_gate::raw_write_line(&format!($($arg)*))
    };
}

/// Writes one line of raw, unstructured output to the gated err stream.
#[macro_export]
macro_rules! raw_eprintln {
    ($($arg:tt)*) => {
        $crate::stream_gate::raw_ewrite_line(&format!($($arg)*))
    };
}
