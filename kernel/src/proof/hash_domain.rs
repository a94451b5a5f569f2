//! Hash domains: the prefixes that keep graph, heuristic, trace and bundle
//! digests from ever colliding.
//!
//! Each domain is listed once below by its tag. The wire prefix is derived
//! from the tag as `WAYFINDER::<TAG>::V1\0`, so a new domain cannot get the
//! framing wrong.

macro_rules! hash_domains {
    ($( $(#[$doc:meta])* $name:ident = $tag:literal; )+) => {
        /// Which kind of content a [`super::hash::canonical_hash`] covers.
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
        pub enum HashDomain {
            $( $(#[$doc])* $name, )+
        }

        impl HashDomain {
            /// Every domain, in listing order.
            pub const ALL: &[HashDomain] = &[$( Self::$name ),+];

            /// Short upper-case tag, e.g. `ROAD_GRAPH`.
            #[must_use]
            pub const fn tag(&self) -> &'static str {
                match self {
                    $( Self::$name => $tag, )+
                }
            }

            /// Prefix fed to SHA-256 ahead of the content.
            #[must_use]
            pub const fn as_bytes(&self) -> &'static [u8] {
                match self {
                    $( Self::$name => concat!("WAYFINDER::", $tag, "::V1\0").as_bytes(), )+
                }
            }
        }
    };
}

hash_domains! {
    /// Road graph fingerprint, neighbor order included.
    RoadGraph = "ROAD_GRAPH";
    HeuristicTable = "HEURISTIC_TABLE";
    /// Canonical trace bytes; bound into the comparison report per strategy.
    SearchTrace = "SEARCH_TRACE";
    /// One artifact inside a bundle.
    BundleArtifact = "BUNDLE_ARTIFACT";
    /// Digest over the normative part of a bundle manifest.
    BundleDigest = "BUNDLE_DIGEST";
}

impl std::fmt::Display for HashDomain {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.tag())
    }
}
