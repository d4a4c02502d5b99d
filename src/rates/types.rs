//! Rate table types

use serde::{Deserialize, Serialize};
use std::fmt;

/// Youngest insurable age
pub const MIN_AGE: u32 = 18;

/// Oldest insurable age
pub const MAX_AGE: u32 = 90;

/// From this age on contributions are paid as a lump sum
pub const LUMPSUM_MIN_AGE: u32 = 61;

/// Who the cover is for
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum FamilySize {
    /// Principal only
    #[serde(rename = "M")]
    M,
    /// Principal and spouse
    #[serde(rename = "M+1")]
    MPlusOne,
}

impl FamilySize {
    pub const ALL: [FamilySize; 2] = [FamilySize::M, FamilySize::MPlusOne];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::M => "M",
            Self::MPlusOne => "M+1",
        }
    }

    pub fn description(&self) -> &'static str {
        match self {
            Self::M => "Principal Only",
            Self::MPlusOne => "Principal + Spouse",
        }
    }
}

impl fmt::Display for FamilySize {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// How contributions are paid
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum PaymentType {
    Lumpsum,
    Annual,
}

impl PaymentType {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Lumpsum => "LUMPSUM",
            Self::Annual => "ANNUAL",
        }
    }
}

impl fmt::Display for PaymentType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Payment type an age must carry
pub fn payment_type_for_age(age: u32) -> PaymentType {
    if age >= LUMPSUM_MIN_AGE {
        PaymentType::Lumpsum
    } else {
        PaymentType::Annual
    }
}

/// Premium for one age and family size, across the four options
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PremiumRate {
    pub age: u32,
    pub family_size: FamilySize,
    pub payment_type: PaymentType,
    pub option_1: f64,
    pub option_2: f64,
    pub option_3: f64,
    pub option_4: f64,
}

/// Row shape read back for verification. Text columns stay untyped so that
/// bad values can be reported instead of failing to decode.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RateRow {
    pub age: u32,
    #[serde(default)]
    pub family_size: Option<String>,
    #[serde(default)]
    pub payment_type: Option<String>,
}
