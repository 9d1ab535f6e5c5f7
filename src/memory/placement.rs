/*!
 * Placement Strategies
 * First, best, and worst fit searches over the block table
 */

use super::block_list::BlockList;
use super::traits::PlacementPolicy;
use crate::core::types::Size;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// Free blocks large enough for `size`, as (position, leftover)
fn candidates(blocks: &BlockList, size: Size) -> impl Iterator<Item = (usize, Size)> + '_ {
    blocks
        .iter()
        .enumerate()
        .filter(move |(_, b)| b.free && b.size >= size)
        .map(move |(i, b)| (i, b.size - size))
}

/// First free block that fits, scanning from the lowest address
#[derive(Debug, Clone, Copy, Default)]
pub struct FirstFit;

/// Free block leaving the smallest leftover; ties go to the lowest address
#[derive(Debug, Clone, Copy, Default)]
pub struct BestFit;

/// Free block leaving the largest leftover; ties go to the lowest address
#[derive(Debug, Clone, Copy, Default)]
pub struct WorstFit;

impl PlacementPolicy for FirstFit {
    fn find(&self, blocks: &BlockList, size: Size) -> Option<usize> {
        candidates(blocks, size).next().map(|(index, _)| index)
    }
}

impl PlacementPolicy for BestFit {
    fn find(&self, blocks: &BlockList, size: Size) -> Option<usize> {
        candidates(blocks, size)
            .fold(None, |best: Option<(usize, Size)>, (index, excess)| match best {
                Some((_, best_excess)) if best_excess <= excess => best,
                _ => Some((index, excess)),
            })
            .map(|(index, _)| index)
    }
}

impl PlacementPolicy for WorstFit {
    fn find(&self, blocks: &BlockList, size: Size) -> Option<usize> {
        candidates(blocks, size)
            .fold(None, |worst: Option<(usize, Size)>, (index, excess)| match worst {
                Some((_, worst_excess)) if worst_excess >= excess => worst,
                _ => Some((index, excess)),
            })
            .map(|(index, _)| index)
    }
}

/// Placement strategy, fixed per manager
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PlacementStrategy {
    FirstFit,
    BestFit,
    WorstFit,
}

impl PlacementStrategy {
    pub const ALL: [PlacementStrategy; 3] = [
        PlacementStrategy::FirstFit,
        PlacementStrategy::BestFit,
        PlacementStrategy::WorstFit,
    ];

    /// Hyphenated label used in simulation headings
    pub fn label(&self) -> &'static str {
        match self {
            PlacementStrategy::FirstFit => "First-Fit",
            PlacementStrategy::BestFit => "Best-Fit",
            PlacementStrategy::WorstFit => "Worst-Fit",
        }
    }
}

impl PlacementPolicy for PlacementStrategy {
    fn find(&self, blocks: &BlockList, size: Size) -> Option<usize> {
        match self {
            PlacementStrategy::FirstFit => FirstFit.find(blocks, size),
            PlacementStrategy::BestFit => BestFit.find(blocks, size),
            PlacementStrategy::WorstFit => WorstFit.find(blocks, size),
        }
    }
}

impl fmt::Display for PlacementStrategy {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            PlacementStrategy::FirstFit => write!(f, "First Fit"),
            PlacementStrategy::BestFit => write!(f, "Best Fit"),
            PlacementStrategy::WorstFit => write!(f, "Worst Fit"),
        }
    }
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("Unknown placement strategy '{0}' (expected first_fit, best_fit or worst_fit)")]
pub struct ParseStrategyError(pub String);

impl FromStr for PlacementStrategy {
    type Err = ParseStrategyError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalized: String = s
            .chars()
            .filter(|c| c.is_ascii_alphanumeric())
            .collect::<String>()
            .to_ascii_lowercase();
        match normalized.as_str() {
            "firstfit" | "first" => Ok(PlacementStrategy::FirstFit),
            "bestfit" | "best" => Ok(PlacementStrategy::BestFit),
            "worstfit" | "worst" => Ok(PlacementStrategy::WorstFit),
            _ => Err(ParseStrategyError(s.to_string())),
        }
    }
}
