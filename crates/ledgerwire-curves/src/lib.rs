//! # ledgerwire-curves
//!
//! Named elliptic-curve domain parameters for the signing layers that sit
//! above the canonical codec. Serialization itself never consults this
//! table; it exists so signing code can resolve a curve by name or OID.
//!
//! The table is a static constant: lookups are read-only and safe from any
//! number of threads.

use std::fmt;

/// Domain parameters of a short-Weierstrass curve y^2 = x^3 + ax + b over
/// the prime field of modulus `p`. All big integers are uppercase hex.
#[derive(Clone, Copy, PartialEq, Eq)]
pub struct CurveParameters {
    pub name: &'static str,
    pub oid: &'static str,
    /// Alternate names this curve is known by.
    pub aliases: &'static [&'static str],
    pub p: &'static str,
    pub a: &'static str,
    pub b: &'static str,
    pub gx: &'static str,
    pub gy: &'static str,
    /// Order of the base point.
    pub n: &'static str,
    /// Cofactor.
    pub h: u32,
}

impl CurveParameters {
    /// Field modulus as big-endian bytes.
    pub fn p_bytes(&self) -> Vec<u8> {
        hex_bytes(self.p)
    }

    /// Base point x coordinate as big-endian bytes.
    pub fn gx_bytes(&self) -> Vec<u8> {
        hex_bytes(self.gx)
    }

    /// Base point y coordinate as big-endian bytes.
    pub fn gy_bytes(&self) -> Vec<u8> {
        hex_bytes(self.gy)
    }

    /// Base point order as big-endian bytes.
    pub fn n_bytes(&self) -> Vec<u8> {
        hex_bytes(self.n)
    }
}

impl fmt::Debug for CurveParameters {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CurveParameters")
            .field("name", &self.name)
            .field("oid", &self.oid)
            .finish()
    }
}

fn hex_bytes(s: &str) -> Vec<u8> {
    // Inputs come only from the static table below; a constant that fails
    // to decode is a broken table, not a caller error.
    hex::decode(s).expect("curve table constants are valid hex")
}

static CURVES: &[CurveParameters] = &[
    CurveParameters {
        name: "secp256k1",
        oid: "1.3.132.0.10",
        aliases: &[],
        p: "FFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFEFFFFFC2F",
        a: "0000000000000000000000000000000000000000000000000000000000000000",
        b: "0000000000000000000000000000000000000000000000000000000000000007",
        gx: "79BE667EF9DCBBAC55A06295CE870B07029BFCDB2DCE28D959F2815B16F81798",
        gy: "483ADA7726A3C4655DA4FBFC0E1108A8FD17B448A68554199C47D08FFB10D4B8",
        n: "FFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFEBAAEDCE6AF48A03BBFD25E8CD0364141",
        h: 1,
    },
    CurveParameters {
        name: "secp256r1",
        oid: "1.2.840.10045.3.1.7",
        aliases: &["P-256", "prime256v1"],
        p: "FFFFFFFF00000001000000000000000000000000FFFFFFFFFFFFFFFFFFFFFFFF",
        a: "FFFFFFFF00000001000000000000000000000000FFFFFFFFFFFFFFFFFFFFFFFC",
        b: "5AC635D8AA3A93E7B3EBBD55769886BC651D06B0CC53B0F63BCE3C3E27D2604B",
        gx: "6B17D1F2E12C4247F8BCE6E563A440F277037D812DEB33A0F4A13945D898C296",
        gy: "4FE342E2FE1A7F9B8EE7EB4A7C0F9E162BCE33576B315ECECBB6406837BF51F5",
        n: "FFFFFFFF00000000FFFFFFFFFFFFFFFFBCE6FAADA7179E84F3B9CAC2FC632551",
        h: 1,
    },
    CurveParameters {
        name: "secp384r1",
        oid: "1.3.132.0.34",
        aliases: &["P-384"],
        p: "FFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFEFFFFFFFF0000000000000000FFFFFFFF",
        a: "FFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFEFFFFFFFF0000000000000000FFFFFFFC",
        b: "B3312FA7E23EE7E4988E056BE3F82D19181D9C6EFE8141120314088F5013875AC656398D8A2ED19D2A85C8EDD3EC2AEF",
        gx: "AA87CA22BE8B05378EB1C71EF320AD746E1D3B628BA79B9859F741E082542A385502F25DBF55296C3A545E3872760AB7",
        gy: "3617DE4A96262C6F5D9E98BF9292DC29F8F41DBD289A147CE9DA3113B5F0B8C00A60B1CE1D7E819D7A431D7C90EA0E5F",
        n: "FFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFC7634D81F4372DDF581A0DB248B0A77AECEC196ACCC52973",
        h: 1,
    },
];

/// Resolve curve parameters by canonical name, alias, or dotted OID.
/// Name matching is case-insensitive.
pub fn parameters_for(name_or_oid: &str) -> Option<&'static CurveParameters> {
    CURVES.iter().find(|curve| {
        curve.name.eq_ignore_ascii_case(name_or_oid)
            || curve.oid == name_or_oid
            || curve
                .aliases
                .iter()
                .any(|alias| alias.eq_ignore_ascii_case(name_or_oid))
    })
}

/// The canonical names of all known curves. The iterator is finite and can
/// be restarted by calling again.
pub fn available_names() -> impl Iterator<Item = &'static str> + Clone {
    CURVES.iter().map(|curve| curve.name)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_lookup_by_name() {
        let curve = parameters_for("secp256k1").unwrap();
        assert_eq!(curve.oid, "1.3.132.0.10");
        assert_eq!(curve.h, 1);
    }

    #[test]
    fn test_lookup_by_oid() {
        let curve = parameters_for("1.2.840.10045.3.1.7").unwrap();
        assert_eq!(curve.name, "secp256r1");
    }

    #[test]
    fn test_lookup_by_alias_case_insensitive() {
        assert_eq!(parameters_for("p-256").unwrap().name, "secp256r1");
        assert_eq!(parameters_for("SECP384R1").unwrap().name, "secp384r1");
    }

    #[test]
    fn test_unknown_curve_absent() {
        assert!(parameters_for("brainpoolP512t1").is_none());
    }

    #[test]
    fn test_available_names_restartable() {
        let names = available_names();
        let first: Vec<&str> = names.clone().collect();
        let second: Vec<&str> = names.collect();
        assert_eq!(first, second);
        assert!(first.contains(&"secp256k1"));
    }

    #[test]
    fn test_parameters_decode_as_hex() {
        for name in available_names() {
            let curve = parameters_for(name).unwrap();
            let field_len = curve.p_bytes().len();
            assert!(field_len == 32 || field_len == 48, "{name}: bad modulus width");
            assert_eq!(curve.gx_bytes().len(), field_len);
            assert_eq!(curve.gy_bytes().len(), field_len);
            assert_eq!(curve.n_bytes().len(), field_len);
            assert_eq!(hex_bytes(curve.a).len(), field_len);
            assert_eq!(hex_bytes(curve.b).len(), field_len);
        }
    }
}
