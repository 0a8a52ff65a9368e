//! Problem definition: commercials, inventories and audience ratings.

use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashMap};
use std::fs;
use std::path::Path;

use log::{info, warn};

use crate::error::ProblemError;

/// Maximum seconds of commercials per broadcast hour, summed across every
/// inventory airing in that hour.
pub const HOURLY_LIMIT: u32 = 720;

/// Revenue reported for a placement whose rating minute is missing from the
/// inventory's table. Finite so that sums stay comparable.
pub const MISSING_RATING_REVENUE: f64 = -1.0e9;

/// Placement requirement of a commercial inside one inventory.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Attention {
    None,
    First,
    Last,
    /// Must start within the first 30 seconds.
    F30,
    /// Must start within the first 60 seconds.
    F60,
}

impl Attention {
    /// Parse the attention codes used by instance files.
    pub fn from_code(code: &str) -> Result<Self, ProblemError> {
        match code {
            "NONE" => Ok(Attention::None),
            "F" => Ok(Attention::First),
            "L" => Ok(Attention::Last),
            "H" => Ok(Attention::F30),
            "M" => Ok(Attention::F60),
            other => Err(ProblemError::UnknownAttention(other.to_string())),
        }
    }

    pub fn code(self) -> &'static str {
        match self {
            Attention::None => "NONE",
            Attention::First => "F",
            Attention::Last => "L",
            Attention::F30 => "H",
            Attention::F60 => "M",
        }
    }

    /// Whether a commercial with this requirement may sit at `position`,
    /// starting at `start_time`, in a sequence whose final index is `last_position`.
    #[inline]
    pub fn is_satisfied(self, position: usize, start_time: u32, last_position: usize) -> bool {
        match self {
            Attention::None => true,
            Attention::First => position == 0,
            Attention::Last => position == last_position,
            Attention::F30 => start_time <= 30,
            Attention::F60 => start_time <= 60,
        }
    }
}

/// How a commercial's price turns into revenue.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum PricingType {
    /// Revenue is rating × price × duration.
    RatingBased,
    /// Revenue is price × duration regardless of audience.
    Fixed,
}

impl PricingType {
    pub fn from_code(code: &str) -> Result<Self, ProblemError> {
        match code {
            "PRR" | "CPP" => Ok(PricingType::RatingBased),
            "FIXED" | "FixPrice" => Ok(PricingType::Fixed),
            other => Err(ProblemError::UnknownPricingType(other.to_string())),
        }
    }

    pub fn code(self) -> &'static str {
        match self {
            PricingType::RatingBased => "PRR",
            PricingType::Fixed => "FIXED",
        }
    }
}

/// A broadcast slot with a fixed length and hour of day.
#[derive(Debug, Clone)]
pub struct Inventory {
    pub id: u32,
    /// Total length in seconds.
    pub duration: u32,
    pub hour: u32,
    /// (minute, audience type) -> rating
    ratings: HashMap<(u32, u32), f64>,
}

impl Inventory {
    /// Create a new inventory without ratings.
    pub fn new(id: u32, duration: u32, hour: u32) -> Self {
        Inventory {
            id,
            duration,
            hour,
            ratings: HashMap::new(),
        }
    }

    /// Builder-style variant of [`Inventory::set_rating`].
    pub fn with_rating(mut self, minute: u32, audience_type: u32, rating: f64) -> Self {
        self.set_rating(minute, audience_type, rating);
        self
    }

    pub fn set_rating(&mut self, minute: u32, audience_type: u32, rating: f64) {
        self.ratings.insert((minute, audience_type), rating);
    }

    pub fn rating(&self, minute: u32, audience_type: u32) -> Option<f64> {
        self.ratings.get(&(minute, audience_type)).copied()
    }

    /// All ratings as (minute, audience type, rating), sorted.
    pub fn ratings(&self) -> Vec<(u32, u32, f64)> {
        let mut ratings: Vec<_> = self
            .ratings
            .iter()
            .map(|(&(minute, audience), &rating)| (minute, audience, rating))
            .collect();
        ratings.sort_by(|a, b| (a.0, a.1).cmp(&(b.0, b.1)));
        ratings
    }
}

/// An ad to be scheduled.
#[derive(Debug, Clone)]
pub struct Commercial {
    pub id: u32,
    /// Length in seconds.
    pub duration: u32,
    pub price: f64,
    pub pricing_type: PricingType,
    pub audience_type: u32,
    pub group: u32,
    /// Suitable inventories by external id, as given to the builder.
    suitability: Vec<(u32, Attention)>,
    /// Attention per inventory index; `None` marks an unsuitable inventory.
    attention: Vec<Option<Attention>>,
    /// Suitable inventory indices in ascending order.
    suitable: Vec<usize>,
    /// Revenue per inventory index and start second `0..=inventory.duration`.
    revenue: Vec<Vec<f64>>,
}

impl Commercial {
    /// Create a new commercial that is not yet suitable for any inventory.
    pub fn new(
        id: u32,
        duration: u32,
        price: f64,
        pricing_type: PricingType,
        audience_type: u32,
        group: u32,
    ) -> Self {
        Commercial {
            id,
            duration,
            price,
            pricing_type,
            audience_type,
            group,
            suitability: Vec::new(),
            attention: Vec::new(),
            suitable: Vec::new(),
            revenue: Vec::new(),
        }
    }

    /// Mark the inventory with external id `inventory_id` as suitable.
    pub fn suitable_for(mut self, inventory_id: u32, attention: Attention) -> Self {
        self.suitability.push((inventory_id, attention));
        self
    }

    /// Revenue for a given audience rating.
    pub fn revenue_for_rating(&self, rating: f64) -> f64 {
        match self.pricing_type {
            PricingType::Fixed => self.price * self.duration as f64,
            PricingType::RatingBased => rating * self.price * self.duration as f64,
        }
    }

    fn revenue_at(&self, inventory: &Inventory, start_time: u32) -> f64 {
        if self.pricing_type == PricingType::Fixed {
            return self.revenue_for_rating(0.0);
        }
        match inventory.rating(rating_minute(start_time), self.audience_type) {
            Some(rating) => self.revenue_for_rating(rating),
            None => MISSING_RATING_REVENUE,
        }
    }

    /// Suitable inventory indices.
    pub fn suitable_inventories(&self) -> &[usize] {
        &self.suitable
    }
}

/// Minute of an inventory whose rating prices a commercial starting at
/// `start_time` seconds.
#[inline]
pub fn rating_minute(start_time: u32) -> u32 {
    start_time / 60 + 1
}

/// Read-only problem instance shared by every search component.
///
/// Commercials and inventories are sorted by id and addressed by dense index.
#[derive(Debug, Clone)]
pub struct Problem {
    pub name: String,
    commercials: Vec<Commercial>,
    inventories: Vec<Inventory>,
    /// Distinct hours in ascending order.
    hours: Vec<u32>,
}

impl Problem {
    /// Create a new problem and precompute every revenue table.
    pub fn new(
        name: String,
        mut inventories: Vec<Inventory>,
        mut commercials: Vec<Commercial>,
    ) -> Result<Self, ProblemError> {
        inventories.sort_by_key(|inventory| inventory.id);
        commercials.sort_by_key(|commercial| commercial.id);

        check_unique("inventory", inventories.iter().map(|inventory| inventory.id))?;
        check_unique("commercial", commercials.iter().map(|commercial| commercial.id))?;

        let index_of: HashMap<u32, usize> = inventories
            .iter()
            .enumerate()
            .map(|(index, inventory)| (inventory.id, index))
            .collect();

        for commercial in &mut commercials {
            let mut attention = vec![None; inventories.len()];
            for &(inventory_id, requirement) in &commercial.suitability {
                let index =
                    *index_of
                        .get(&inventory_id)
                        .ok_or(ProblemError::UnknownInventory {
                            commercial: commercial.id,
                            inventory: inventory_id,
                        })?;
                if attention[index].is_some() {
                    return Err(ProblemError::DuplicateAttention {
                        commercial: commercial.id,
                        inventory: inventory_id,
                    });
                }
                attention[index] = Some(requirement);
            }

            commercial.suitable = (0..inventories.len())
                .filter(|&index| attention[index].is_some())
                .collect();
            commercial.revenue = inventories
                .iter()
                .enumerate()
                .map(|(index, inventory)| {
                    if attention[index].is_none() {
                        return Vec::new();
                    }
                    (0..=inventory.duration)
                        .map(|start| commercial.revenue_at(inventory, start))
                        .collect()
                })
                .collect();
            commercial.attention = attention;
        }

        let mut hours: Vec<u32> = inventories.iter().map(|inventory| inventory.hour).collect();
        hours.sort_unstable();
        hours.dedup();

        Ok(Problem {
            name,
            commercials,
            inventories,
            hours,
        })
    }

    /// Load a problem from an instance JSON file. The instance name is the file stem.
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, ProblemError> {
        let path = path.as_ref();
        info!("Reading data from {}...", path.display());
        let contents = fs::read_to_string(path)?;
        let name = path
            .file_stem()
            .map(|stem| stem.to_string_lossy().into_owned())
            .unwrap_or_else(|| "instance".to_string());
        let problem = Self::from_json_str(name, &contents)?;
        info!(
            "Read {} commercials and {} inventories",
            problem.num_commercials(),
            problem.num_inventories()
        );
        Ok(problem)
    }

    /// Parse a problem from instance JSON.
    pub fn from_json_str(name: String, json: &str) -> Result<Self, ProblemError> {
        let instance: InstanceFile = serde_json::from_str(json)?;
        Self::from_instance(name, instance)
    }

    /// Build a problem from its serialized form.
    pub fn from_instance(name: String, instance: InstanceFile) -> Result<Self, ProblemError> {
        let mut inventories: Vec<Inventory> = instance
            .inventories
            .iter()
            .map(|record| Inventory::new(record.id, record.duration, record.hour))
            .collect();

        let positions: HashMap<u32, usize> = inventories
            .iter()
            .enumerate()
            .map(|(index, inventory)| (inventory.id, index))
            .collect();
        for rating in &instance.ratings {
            match positions.get(&rating.inventory_id) {
                Some(&index) => inventories[index].set_rating(
                    rating.minute,
                    rating.audience_type,
                    rating.rating,
                ),
                None => warn!(
                    "Skipping rating for unknown inventory {}",
                    rating.inventory_id
                ),
            }
        }

        let mut commercials = Vec::with_capacity(instance.commercials.len());
        for record in &instance.commercials {
            let mut commercial = Commercial::new(
                record.id,
                record.duration,
                record.price,
                PricingType::from_code(&record.pricing_type)?,
                record.audience_type,
                record.group,
            );
            for (code, inventory_ids) in &record.suitable_inventories {
                let attention = Attention::from_code(code)?;
                for &inventory_id in inventory_ids {
                    commercial = commercial.suitable_for(inventory_id, attention);
                }
            }
            commercials.push(commercial);
        }

        Self::new(name, inventories, commercials)
    }

    /// Serializable form of this problem, the inverse of [`Problem::from_instance`].
    pub fn to_instance(&self) -> InstanceFile {
        let inventories = self
            .inventories
            .iter()
            .map(|inventory| InventoryRecord {
                id: inventory.id,
                duration: inventory.duration,
                hour: inventory.hour,
            })
            .collect();

        let commercials = self
            .commercials
            .iter()
            .map(|commercial| {
                let mut suitable_inventories: BTreeMap<String, Vec<u32>> = BTreeMap::new();
                for &index in &commercial.suitable {
                    if let Some(attention) = commercial.attention[index] {
                        suitable_inventories
                            .entry(attention.code().to_string())
                            .or_default()
                            .push(self.inventories[index].id);
                    }
                }
                CommercialRecord {
                    id: commercial.id,
                    duration: commercial.duration,
                    price: commercial.price,
                    audience_type: commercial.audience_type,
                    pricing_type: commercial.pricing_type.code().to_string(),
                    group: commercial.group,
                    suitable_inventories,
                }
            })
            .collect();

        let ratings = self
            .inventories
            .iter()
            .flat_map(|inventory| {
                inventory
                    .ratings()
                    .into_iter()
                    .map(move |(minute, audience_type, rating)| RatingRecord {
                        inventory_id: inventory.id,
                        minute,
                        audience_type,
                        rating,
                    })
            })
            .collect();

        InstanceFile {
            inventories,
            commercials,
            ratings,
        }
    }

    pub fn commercials(&self) -> &[Commercial] {
        &self.commercials
    }

    pub fn inventories(&self) -> &[Inventory] {
        &self.inventories
    }

    #[inline]
    pub fn commercial(&self, index: usize) -> &Commercial {
        &self.commercials[index]
    }

    #[inline]
    pub fn inventory(&self, index: usize) -> &Inventory {
        &self.inventories[index]
    }

    pub fn num_commercials(&self) -> usize {
        self.commercials.len()
    }

    pub fn num_inventories(&self) -> usize {
        self.inventories.len()
    }

    /// Distinct broadcast hours in ascending order.
    pub fn hours(&self) -> &[u32] {
        &self.hours
    }

    /// Attention requirement of a commercial in an inventory, or `None` if
    /// the inventory is not suitable for it.
    #[inline]
    pub fn attention(&self, commercial: usize, inventory: usize) -> Option<Attention> {
        self.commercials[commercial].attention[inventory]
    }

    #[inline]
    pub fn is_suitable(&self, commercial: usize, inventory: usize) -> bool {
        self.attention(commercial, inventory).is_some()
    }

    /// Precomputed revenue of a commercial starting at `start_time` in an inventory.
    ///
    /// Start times past the end of the inventory, or unsuitable inventories,
    /// yield [`MISSING_RATING_REVENUE`].
    #[inline]
    pub fn revenue(&self, commercial: usize, inventory: usize, start_time: u32) -> f64 {
        self.commercials[commercial].revenue[inventory]
            .get(start_time as usize)
            .copied()
            .unwrap_or(MISSING_RATING_REVENUE)
    }
}

fn check_unique(kind: &'static str, ids: impl Iterator<Item = u32>) -> Result<(), ProblemError> {
    let mut previous = None;
    for id in ids {
        if previous == Some(id) {
            return Err(ProblemError::DuplicateId { kind, id });
        }
        previous = Some(id);
    }
    Ok(())
}

/// Instance file layout.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct InstanceFile {
    pub inventories: Vec<InventoryRecord>,
    pub commercials: Vec<CommercialRecord>,
    #[serde(default)]
    pub ratings: Vec<RatingRecord>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct InventoryRecord {
    pub id: u32,
    pub duration: u32,
    pub hour: u32,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CommercialRecord {
    pub id: u32,
    pub duration: u32,
    pub price: f64,
    pub audience_type: u32,
    pub pricing_type: String,
    pub group: u32,
    /// Attention code -> inventory ids.
    pub suitable_inventories: BTreeMap<String, Vec<u32>>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RatingRecord {
    pub inventory_id: u32,
    pub minute: u32,
    pub audience_type: u32,
    pub rating: f64,
}
