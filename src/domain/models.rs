use std::collections::{BTreeMap, HashSet};
use std::fmt;

use super::errors::ValidationError;
use super::value_objects::{SolveStatus, SourceId, UserId};

/// Numerical tolerance used when clamping solver noise and when comparing
/// solved quantities in tests.
pub const TOLERANCE: f64 = 1e-6;

/// Demand-side user class with an annual volumetric demand, a blended
/// quality tolerance and a deficit penalty weight.
#[derive(Debug, Clone, PartialEq)]
pub struct User {
    pub id: UserId,
    /// Annual demand [m³/year]
    pub demand: f64,
    /// Maximum allowed blended contaminant concentration [kg/m³]
    pub ppm_max: f64,
    /// Penalty per unit of unmet demand
    pub deficit_weight: f64,
}

impl User {
    pub fn new(id: impl Into<UserId>, demand: f64, ppm_max: f64, deficit_weight: f64) -> Self {
        Self {
            id: id.into(),
            demand,
            ppm_max,
            deficit_weight,
        }
    }
}

/// Supply-side source with an annual capacity, native contaminant
/// concentration, over-extraction penalty weight and unit extraction cost.
#[derive(Debug, Clone, PartialEq)]
pub struct Source {
    pub id: SourceId,
    /// Annual supply capacity [m³/year]
    pub supply: f64,
    /// Native contaminant concentration [kg/m³]
    pub ppm: f64,
    /// Penalty per unit of excess draw
    pub over_extraction_weight: f64,
    /// Cost per unit extracted [$/m³]
    pub extraction_cost: f64,
}

impl Source {
    pub fn new(
        id: impl Into<SourceId>,
        supply: f64,
        ppm: f64,
        over_extraction_weight: f64,
        extraction_cost: f64,
    ) -> Self {
        Self {
            id: id.into(),
            supply,
            ppm,
            over_extraction_weight,
            extraction_cost,
        }
    }
}

/// Source-user pairs disallowed by policy. Their allocation variables stay in
/// the index space but are fixed at zero.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct InfeasiblePairSet {
    pairs: HashSet<(SourceId, UserId)>,
}

impl InfeasiblePairSet {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(mut self, source: impl Into<SourceId>, user: impl Into<UserId>) -> Self {
        self.insert(source, user);
        self
    }

    pub fn insert(&mut self, source: impl Into<SourceId>, user: impl Into<UserId>) {
        self.pairs.insert((source.into(), user.into()));
    }

    pub fn contains(&self, source: &SourceId, user: &UserId) -> bool {
        self.pairs.contains(&(source.clone(), user.clone()))
    }

    pub fn iter(&self) -> impl Iterator<Item = &(SourceId, UserId)> {
        self.pairs.iter()
    }

    pub fn len(&self) -> usize {
        self.pairs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pairs.is_empty()
    }
}

impl FromIterator<(SourceId, UserId)> for InfeasiblePairSet {
    fn from_iter<I: IntoIterator<Item = (SourceId, UserId)>>(iter: I) -> Self {
        Self {
            pairs: iter.into_iter().collect(),
        }
    }
}

/// Validated allocation scenario. Construction rejects malformed input, so a
/// value of this type is always safe to formulate.
#[derive(Debug, Clone)]
pub struct AllocationProblem {
    users: Vec<User>,
    sources: Vec<Source>,
    budget: f64,
    infeasible_pairs: InfeasiblePairSet,
}

impl AllocationProblem {
    pub fn new(
        users: Vec<User>,
        sources: Vec<Source>,
        budget: f64,
        infeasible_pairs: InfeasiblePairSet,
    ) -> Result<Self, ValidationError> {
        let mut user_ids = HashSet::new();
        for user in &users {
            if !user_ids.insert(user.id.clone()) {
                return Err(ValidationError::DuplicateUserId(user.id.clone()));
            }
            check_user_field(user, "demand", user.demand)?;
            check_user_field(user, "deficit weight", user.deficit_weight)?;
        }

        let mut source_ids = HashSet::new();
        for source in &sources {
            if !source_ids.insert(source.id.clone()) {
                return Err(ValidationError::DuplicateSourceId(source.id.clone()));
            }
            check_source_field(source, "supply", source.supply)?;
            check_source_field(source, "over-extraction weight", source.over_extraction_weight)?;
            check_source_field(source, "extraction cost", source.extraction_cost)?;
        }

        if !(budget >= 0.0) {
            return Err(ValidationError::NegativeBudget(budget));
        }

        for (source_id, user_id) in infeasible_pairs.iter() {
            if !source_ids.contains(source_id) {
                return Err(ValidationError::UnknownPairSource(source_id.clone()));
            }
            if !user_ids.contains(user_id) {
                return Err(ValidationError::UnknownPairUser(user_id.clone()));
            }
        }

        Ok(Self {
            users,
            sources,
            budget,
            infeasible_pairs,
        })
    }

    pub fn users(&self) -> &[User] {
        &self.users
    }

    pub fn sources(&self) -> &[Source] {
        &self.sources
    }

    pub fn budget(&self) -> f64 {
        self.budget
    }

    pub fn infeasible_pairs(&self) -> &InfeasiblePairSet {
        &self.infeasible_pairs
    }
}

// `!(v >= 0.0)` also catches NaN.
fn check_user_field(user: &User, field: &'static str, value: f64) -> Result<(), ValidationError> {
    if !(value >= 0.0) {
        return Err(ValidationError::NegativeUserField {
            id: user.id.clone(),
            field,
            value,
        });
    }
    Ok(())
}

fn check_source_field(
    source: &Source,
    field: &'static str,
    value: f64,
) -> Result<(), ValidationError> {
    if !(value >= 0.0) {
        return Err(ValidationError::NegativeSourceField {
            id: source.id.clone(),
            field,
            value,
        });
    }
    Ok(())
}

/// Solved allocation plan, keyed by the scenario's identifiers.
#[derive(Debug, Clone)]
pub struct AllocationReport {
    pub status: SolveStatus,
    /// Weighted deficit + over-extraction penalty at the solution
    pub objective: f64,
    /// Flow from each source to each user [m³/year]
    pub allocations: BTreeMap<(SourceId, UserId), f64>,
    /// Unmet demand per user [m³/year]
    pub deficits: BTreeMap<UserId, f64>,
    /// Excess draw per source [m³/year]
    pub over_extractions: BTreeMap<SourceId, f64>,
    /// Total extraction expenditure at the solution
    pub budget_used: f64,
}

impl AllocationReport {
    /// Flow from `source` to `user`; zero for pairs outside the scenario.
    pub fn allocation(&self, source: &SourceId, user: &UserId) -> f64 {
        self.allocations
            .get(&(source.clone(), user.clone()))
            .copied()
            .unwrap_or(0.0)
    }

    /// Total inflow delivered to `user`.
    pub fn total_inflow(&self, user: &UserId) -> f64 {
        self.allocations
            .iter()
            .filter(|((_, u), _)| u == user)
            .map(|(_, flow)| flow)
            .sum()
    }

    /// Total outflow drawn from `source`.
    pub fn total_outflow(&self, source: &SourceId) -> f64 {
        self.allocations
            .iter()
            .filter(|((s, _), _)| s == source)
            .map(|(_, flow)| flow)
            .sum()
    }
}

impl fmt::Display for AllocationReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Status: {} (objective {:.4})", self.status, self.objective)?;
        writeln!(f)?;
        writeln!(f, "Deficit of water [m³/year]:")?;
        for (user, deficit) in &self.deficits {
            writeln!(f, "  {user}: {deficit:.4}")?;
        }
        writeln!(f)?;
        writeln!(f, "Exceedance in extraction [m³/year]:")?;
        for (source, excess) in &self.over_extractions {
            writeln!(f, "  {source}: {excess:.4}")?;
        }
        writeln!(f)?;
        writeln!(f, "Allocation [m³/year]:")?;
        for ((source, user), flow) in &self.allocations {
            writeln!(f, "  {source} -> {user}: {flow:.4}")?;
        }
        writeln!(f)?;
        write!(f, "Budget used: {:.4}", self.budget_used)
    }
}
