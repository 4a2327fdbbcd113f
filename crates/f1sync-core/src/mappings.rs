//! Calculator abbreviations to site display names.

use crate::error::MappingError;
use crate::identity::{contains_member, same_member};
use crate::optimizer::OptimalTeam;
use crate::spec::DesiredSpec;

/// Driver abbreviations for the current season.
pub const DRIVERS: &[(&str, &str)] = &[
    ("VER", "Max Verstappen"),
    ("RUS", "George Russell"),
    ("NOR", "Lando Norris"),
    ("PIA", "Oscar Piastri"),
    ("ANT", "Kimi Antonelli"),
    ("LEC", "Charles Leclerc"),
    ("HAM", "Lewis Hamilton"),
    ("HAD", "Isack Hadjar"),
    ("GAS", "Pierre Gasly"),
    ("SAI", "Carlos Sainz"),
    ("ALB", "Alexander Albon"),
    ("ALO", "Fernando Alonso"),
    ("STR", "Lance Stroll"),
    ("BEA", "Oliver Bearman"),
    ("OCO", "Esteban Ocon"),
    ("HUL", "Nico Hulkenberg"),
    ("LAW", "Liam Lawson"),
    ("BOR", "Gabriel Bortoleto"),
    ("LIN", "Arvid Lindblad"),
    ("COL", "Franco Colapinto"),
    ("PER", "Sergio Perez"),
    ("BOT", "Valtteri Bottas"),
];

/// Constructor abbreviations for the current season.
pub const CONSTRUCTORS: &[(&str, &str)] = &[
    ("MCL", "McLaren"),
    ("FER", "Ferrari"),
    ("MER", "Mercedes"),
    ("RBR", "Red Bull Racing"),
    ("ALP", "Alpine"),
    ("WIL", "Williams"),
    ("AST", "Aston Martin"),
    ("HAA", "Haas F1 Team"),
    ("AUD", "Audi"),
    ("RB", "Racing Bulls"),
    ("CAD", "Cadillac"),
];

fn lookup(table: &[(&str, &'static str)], abbr: &str) -> Option<&'static str> {
    table
        .iter()
        .find(|(a, _)| a.eq_ignore_ascii_case(abbr.trim()))
        .map(|(_, full)| *full)
}

pub fn driver_name(abbr: &str) -> Option<&'static str> {
    lookup(DRIVERS, abbr)
}

pub fn constructor_name(abbr: &str) -> Option<&'static str> {
    lookup(CONSTRUCTORS, abbr)
}

/// Whether a scraped display name is one of the known constructors.
pub fn is_constructor_name(name: &str) -> bool {
    CONSTRUCTORS.iter().any(|(_, full)| same_member(full, name))
}

/// Translate an optimizer result into a desired roster.
///
/// `boost_override` is a display name and must be one of the mapped drivers.
pub fn map_optimal_to_desired(
    optimal: &OptimalTeam,
    boost_override: Option<&str>,
) -> Result<DesiredSpec, MappingError> {
    let drivers = optimal
        .drivers
        .iter()
        .map(|a| {
            driver_name(a)
                .map(str::to_string)
                .ok_or_else(|| MappingError::UnknownDriver(a.clone()))
        })
        .collect::<Result<Vec<_>, _>>()?;

    let constructors = optimal
        .constructors
        .iter()
        .map(|a| {
            constructor_name(a)
                .map(str::to_string)
                .ok_or_else(|| MappingError::UnknownConstructor(a.clone()))
        })
        .collect::<Result<Vec<_>, _>>()?;

    let boost_driver = match boost_override {
        Some(name) => {
            if !contains_member(&drivers, name) {
                return Err(MappingError::BoostOverrideNotSelected(name.to_string()));
            }
            // Keep the canonical spelling so the site's alt text matches.
            drivers.iter().find(|d| same_member(d, name)).cloned()
        }
        None => match optimal.boost.as_deref() {
            Some(a) => Some(
                driver_name(a)
                    .map(str::to_string)
                    .ok_or_else(|| MappingError::UnknownDriver(a.to_string()))?,
            ),
            None => None,
        },
    };

    Ok(DesiredSpec::new(drivers, constructors, boost_driver))
}
