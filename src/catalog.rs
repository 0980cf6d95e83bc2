//! Category catalog and per-session round queue.
//!
//! The built-in table lists the 15 classes the bundled sketch model was
//! trained on. Order matters: position `n` is the model's class index `n`.

use rand::Rng;
use rand::seq::SliceRandom;

/// A drawable object class and the hint shown to the player.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct Category {
    pub name: &'static str,
    pub hint: &'static str,
}

impl Category {
    pub const fn new(name: &'static str, hint: &'static str) -> Self {
        Self { name, hint }
    }
}

pub const CATEGORIES: &[Category] = &[
    Category::new("apple", "Fruit with a stem and a leaf on top"),
    Category::new("bowtie", "A symmetrical accessory worn around the neck"),
    Category::new("candle", "A cylindrical object with a wick on top"),
    Category::new("door", "A rectangular object with a knob or handle"),
    Category::new("envelope", "A paper container used for sending letters"),
    Category::new("fish", "An aquatic creature with fins and gills"),
    Category::new("guitar", "A musical instrument with strings and a body"),
    Category::new("ice cream", "A frozen dessert usually served in a cone or a cup"),
    Category::new("lightning", "A sudden electrostatic discharge during a thunderstorm"),
    Category::new("moon", "A natural satellite that orbits around the Earth"),
    Category::new("mountain", "A large landform that rises above the surrounding land"),
    Category::new("star", "A luminous celestial object visible in the night sky"),
    Category::new("tent", "A portable shelter typically used for camping"),
    Category::new("toothbrush", "An oral hygiene instrument used for cleaning teeth"),
    Category::new("wristwatch", "A timekeeping device worn on the wrist"),
];

/// Read-only view over a category table. Cheap to copy.
#[derive(Clone, Copy, Debug)]
pub struct Catalog {
    categories: &'static [Category],
}

impl Default for Catalog {
    fn default() -> Self {
        Self::builtin()
    }
}

impl Catalog {
    pub const fn builtin() -> Self {
        Self { categories: CATEGORIES }
    }

    /// Wrap a custom table. Entries are expected to have unique names.
    pub const fn from_static(categories: &'static [Category]) -> Self {
        Self { categories }
    }

    pub fn len(&self) -> usize {
        self.categories.len()
    }

    pub fn is_empty(&self) -> bool {
        self.categories.is_empty()
    }

    pub fn categories(&self) -> &'static [Category] {
        self.categories
    }

    /// Category for a classifier class index.
    pub fn get(&self, index: usize) -> Option<Category> {
        self.categories.get(index).copied()
    }

    pub fn by_name(&self, name: &str) -> Option<Category> {
        self.categories.iter().find(|c| c.name == name).copied()
    }

    pub fn index_of(&self, name: &str) -> Option<usize> {
        self.categories.iter().position(|c| c.name == name)
    }
}

/// Requested more rounds than the catalog can fill without repeats.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct QueueShortfall {
    pub requested: usize,
    pub available: usize,
}

/// Ordered targets for one session. Never contains a category twice.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct RoundQueue {
    rounds: Vec<Category>,
}

impl RoundQueue {
    /// Fisher–Yates shuffle of the whole catalog, truncated to `round_count`.
    pub fn shuffled<R: Rng + ?Sized>(
        catalog: &Catalog,
        round_count: usize,
        rng: &mut R,
    ) -> (Self, Option<QueueShortfall>) {
        let mut rounds = catalog.categories().to_vec();
        rounds.shuffle(rng);
        let shortfall = (round_count > rounds.len()).then(|| QueueShortfall {
            requested: round_count,
            available: rounds.len(),
        });
        rounds.truncate(round_count);
        (Self { rounds }, shortfall)
    }

    pub fn len(&self) -> usize {
        self.rounds.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rounds.is_empty()
    }

    pub fn get(&self, index: usize) -> Option<Category> {
        self.rounds.get(index).copied()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Category> {
        self.rounds.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand::rngs::StdRng;
    use std::collections::HashSet;

    static PAIR: [Category; 2] = [Category::new("a", "first"), Category::new("b", "second")];

    #[test]
    fn builtin_catalog_has_fifteen_unique_entries() {
        let cat = Catalog::builtin();
        assert_eq!(cat.len(), 15);
        let names: HashSet<_> = cat.categories().iter().map(|c| c.name).collect();
        assert_eq!(names.len(), 15);
        assert!(cat.categories().iter().all(|c| !c.hint.is_empty()));
    }

    #[test]
    fn index_order_matches_model_classes() {
        let cat = Catalog::builtin();
        assert_eq!(cat.get(0).map(|c| c.name), Some("apple"));
        assert_eq!(cat.get(7).map(|c| c.name), Some("ice cream"));
        assert_eq!(cat.get(14).map(|c| c.name), Some("wristwatch"));
        assert_eq!(cat.get(15), None);
        assert_eq!(cat.index_of("moon"), Some(9));
    }

    #[test]
    fn shuffled_queue_is_truncated_and_unique() {
        let mut rng = StdRng::seed_from_u64(7);
        for _ in 0..50 {
            let (queue, shortfall) = RoundQueue::shuffled(&Catalog::builtin(), 4, &mut rng);
            assert!(shortfall.is_none());
            assert_eq!(queue.len(), 4);
            let names: HashSet<_> = queue.iter().map(|c| c.name).collect();
            assert_eq!(names.len(), 4);
        }
    }

    #[test]
    fn small_catalog_reports_shortfall() {
        let mut rng = StdRng::seed_from_u64(1);
        let (queue, shortfall) = RoundQueue::shuffled(&Catalog::from_static(&PAIR), 4, &mut rng);
        assert_eq!(queue.len(), 2);
        assert_eq!(
            shortfall,
            Some(QueueShortfall {
                requested: 4,
                available: 2
            })
        );
    }

    #[test]
    fn same_seed_same_order() {
        let a = RoundQueue::shuffled(&Catalog::builtin(), 4, &mut StdRng::seed_from_u64(42)).0;
        let b = RoundQueue::shuffled(&Catalog::builtin(), 4, &mut StdRng::seed_from_u64(42)).0;
        assert_eq!(a, b);
    }
}
