//! Layout documents compiled into the binary.

/// `(file name, content)` for every shipped layout document
pub const BUNDLED_SOURCES: &[(&str, &str)] = &[
    ("clients.toml", include_str!("../layouts/clients.toml")),
    ("trx_claims.toml", include_str!("../layouts/trx_claims.toml")),
    ("umr_accumulator.toml", include_str!("../layouts/umr_accumulator.toml")),
    ("allied_moop.toml", include_str!("../layouts/allied_moop.toml")),
    ("asr_ppx_accum.toml", include_str!("../layouts/asr_ppx_accum.toml")),
    ("allied_eligibility.toml", include_str!("../layouts/allied_eligibility.toml")),
    ("asr_eligibility.toml", include_str!("../layouts/asr_eligibility.toml")),
];

/// Name of the document holding client rules and bindings
pub const CLIENTS_DOCUMENT: &str = "clients.toml";
