//! Discount Plans

use std::fmt;

use crate::plans::{prepaid::PrepaidRule, unlimited::UnlimitedOption};

pub mod prepaid;
pub mod unlimited;

/// Label used for the "no plan" option.
pub const STANDARD_LABEL: &str = "standard";

/// Plan family
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PlanKind {
    /// Pay the listed price per visit
    Standard,

    /// Prepaid multi-visit bundle
    Prepaid,

    /// Unlimited-use pass
    Unlimited,
}

impl fmt::Display for PlanKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PlanKind::Standard => f.write_str(STANDARD_LABEL),
            PlanKind::Prepaid => f.write_str("prepaid"),
            PlanKind::Unlimited => f.write_str("unlimited"),
        }
    }
}

/// A candidate way of paying for a service.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Plan<'a> {
    /// No plan, standard price per visit
    Standard,

    /// Prepaid bundle
    Prepaid(&'a PrepaidRule),

    /// Unlimited pass
    Unlimited(&'a UnlimitedOption<'a>),
}

impl<'a> Plan<'a> {
    /// Return the plan family.
    pub fn kind(&self) -> PlanKind {
        match self {
            Plan::Standard => PlanKind::Standard,
            Plan::Prepaid(_) => PlanKind::Prepaid,
            Plan::Unlimited(_) => PlanKind::Unlimited,
        }
    }

    /// Return the plan code, or `None` for standard pricing.
    pub fn code(&self) -> Option<&'a str> {
        match self {
            Plan::Standard => None,
            Plan::Prepaid(rule) => Some(rule.code.as_str()),
            Plan::Unlimited(option) => Some(option.code.as_str()),
        }
    }

    /// Return the plan description, or `None` for standard pricing.
    pub fn description(&self) -> Option<&'a str> {
        match self {
            Plan::Standard => None,
            Plan::Prepaid(rule) => Some(rule.description.as_str()),
            Plan::Unlimited(option) => Some(option.description.as_str()),
        }
    }

    /// Return whether this is standard pricing.
    pub fn is_standard(&self) -> bool {
        matches!(self, Plan::Standard)
    }
}

impl fmt::Display for Plan<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code().unwrap_or(STANDARD_LABEL))
    }
}
