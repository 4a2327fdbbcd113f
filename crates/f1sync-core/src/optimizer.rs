//! Best team under a budget, from calculator simulation data.

use std::collections::{BTreeMap, HashMap};

use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::debug;

use crate::error::OptimizerError;
use crate::model::round3;

const EPS: f64 = 1e-9;
const TEAM_DRIVERS: usize = 5;
const TEAM_CONSTRUCTORS: usize = 2;

/// JSON object embedded in the team-calculator page.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CalculatorData {
    #[serde(default)]
    pub drivers: Vec<CalculatorEntry>,
    #[serde(default)]
    pub constructors: Vec<CalculatorEntry>,
    #[serde(default)]
    pub analyst_sims: Vec<AnalystSim>,
}

/// A driver or constructor as listed by the calculator.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct CalculatorEntry {
    #[serde(rename = "type", default)]
    pub kind: Option<String>,
    #[serde(default)]
    pub id: Option<Value>,
    #[serde(default)]
    pub abbreviation: Option<String>,
    #[serde(default)]
    pub price: Option<f64>,
}

impl CalculatorEntry {
    pub fn is_kind(&self, kind: &str) -> bool {
        self.kind.as_deref() == Some(kind)
    }

    /// Entry id as a string key; sims key driver points by id.
    pub fn id_key(&self) -> Option<String> {
        match self.id.as_ref()? {
            Value::String(s) if !s.is_empty() => Some(s.clone()),
            Value::Number(n) => Some(n.to_string()),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct AnalystSim {
    #[serde(default)]
    pub id: Option<Value>,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub raceweek: Option<Value>,
    #[serde(default)]
    pub season: Option<Value>,
    #[serde(default)]
    pub drivers: SimPoints,
    #[serde(default)]
    pub constructors: SimPoints,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct SimPoints {
    #[serde(default)]
    pub pts: BTreeMap<String, f64>,
}

/// Which simulation a result was computed from.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SimulationInfo {
    pub id: Option<Value>,
    pub name: Option<String>,
    pub raceweek: Option<Value>,
    pub season: Option<Value>,
}

impl From<&AnalystSim> for SimulationInfo {
    fn from(sim: &AnalystSim) -> Self {
        Self {
            id: sim.id.clone(),
            name: sim.name.clone(),
            raceweek: sim.raceweek.clone(),
            season: sim.season.clone(),
        }
    }
}

/// Optimizer output, abbreviations sorted alphabetically.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OptimalTeam {
    pub max_budget: f64,
    pub constructors: Vec<String>,
    pub drivers: Vec<String>,
    pub boost: Option<String>,
    pub total_cost: f64,
    pub expected_points: f64,
    pub sim: SimulationInfo,
}

#[derive(Debug, Clone)]
struct Pick {
    code: String,
    price: f64,
    pts: f64,
}

/// Five drivers with their summed cost and points plus the best boost.
struct DriverSet {
    members: Vec<usize>,
    cost: f64,
    points: f64,
    boost: usize,
}

/// Pick 2 constructors, 5 drivers and a boosted driver maximising expected
/// points with total cost at most `max_budget`.
///
/// The boosted driver scores twice. Equal points go to the cheaper team.
pub fn compute_optimal(
    max_budget: f64,
    data: &CalculatorData,
) -> Result<OptimalTeam, OptimizerError> {
    let sim = data.analyst_sims.first().ok_or(OptimizerError::NoSimulation)?;

    let driver_meta: HashMap<String, (&str, f64)> = data
        .drivers
        .iter()
        .filter(|d| d.is_kind("driver"))
        .filter_map(|d| {
            let abbr = d.abbreviation.as_deref().filter(|a| !a.is_empty())?;
            Some((d.id_key()?, (abbr, d.price?)))
        })
        .collect();

    let constructor_price: HashMap<&str, f64> = data
        .constructors
        .iter()
        .filter(|c| c.is_kind("constructor"))
        .filter_map(|c| {
            let abbr = c.abbreviation.as_deref().filter(|a| !a.is_empty())?;
            Some((abbr, c.price?))
        })
        .collect();

    let drivers: Vec<Pick> = sim
        .drivers
        .pts
        .iter()
        .filter_map(|(id, pts)| {
            let (abbr, price) = driver_meta.get(id)?;
            Some(Pick {
                code: abbr.to_string(),
                price: *price,
                pts: *pts,
            })
        })
        .collect();

    let constructors: Vec<Pick> = sim
        .constructors
        .pts
        .iter()
        .filter_map(|(abbr, pts)| {
            let price = constructor_price.get(abbr.as_str())?;
            Some(Pick {
                code: abbr.clone(),
                price: *price,
                pts: *pts,
            })
        })
        .collect();

    if drivers.is_empty() || constructors.is_empty() {
        return Err(OptimizerError::EmptyPickList);
    }
    debug!(
        drivers = drivers.len(),
        constructors = constructors.len(),
        max_budget,
        "Searching team combinations"
    );

    let driver_sets: Vec<DriverSet> = combinations(drivers.len(), TEAM_DRIVERS)
        .into_iter()
        .map(|members| {
            let cost: f64 = members.iter().map(|&i| drivers[i].price).sum();
            let points: f64 = members.iter().map(|&i| drivers[i].pts).sum();
            let mut boost = members[0];
            for &i in &members[1..] {
                if drivers[i].pts > drivers[boost].pts + EPS {
                    boost = i;
                }
            }
            DriverSet {
                members,
                cost,
                points,
                boost,
            }
        })
        .collect();

    // (points, cost, constructor pair, driver set)
    let mut best: Option<(f64, f64, Vec<usize>, &DriverSet)> = None;

    for pair in combinations(constructors.len(), TEAM_CONSTRUCTORS) {
        let c_cost: f64 = pair.iter().map(|&i| constructors[i].price).sum();
        let c_points: f64 = pair.iter().map(|&i| constructors[i].pts).sum();
        if c_cost >= max_budget {
            continue;
        }

        for set in &driver_sets {
            let total_cost = c_cost + set.cost;
            if total_cost > max_budget + EPS {
                continue;
            }
            let points = c_points + set.points + drivers[set.boost].pts;
            let better = match &best {
                None => true,
                Some((bp, bc, _, _)) => {
                    points > bp + EPS || ((points - bp).abs() < EPS && total_cost < bc - EPS)
                }
            };
            if better {
                best = Some((points, total_cost, pair.clone(), set));
            }
        }
    }

    let (points, cost, pair, set) =
        best.ok_or_else(|| OptimizerError::Infeasible(format!("{:.3}", max_budget)))?;

    let mut constructor_codes: Vec<String> =
        pair.iter().map(|&i| constructors[i].code.clone()).collect();
    constructor_codes.sort();
    let mut driver_codes: Vec<String> =
        set.members.iter().map(|&i| drivers[i].code.clone()).collect();
    driver_codes.sort();

    Ok(OptimalTeam {
        max_budget: round3(max_budget),
        constructors: constructor_codes,
        drivers: driver_codes,
        boost: Some(drivers[set.boost].code.clone()),
        total_cost: round3(cost),
        expected_points: round3(points),
        sim: SimulationInfo::from(sim),
    })
}

/// All `k`-element index combinations of `0..n`, in lexicographic order.
fn combinations(n: usize, k: usize) -> Vec<Vec<usize>> {
    let mut out = Vec::new();
    if k == 0 || k > n {
        return out;
    }
    let mut idx: Vec<usize> = (0..k).collect();
    loop {
        out.push(idx.clone());
        let mut i = k;
        loop {
            if i == 0 {
                return out;
            }
            i -= 1;
            if idx[i] != i + n - k {
                break;
            }
        }
        idx[i] += 1;
        for j in i + 1..k {
            idx[j] = idx[j - 1] + 1;
        }
    }
}
