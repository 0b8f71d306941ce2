//! Named value bands over the committed value.
//!
//! Zones are kept in registration order in fixed-capacity storage; the first
//! zone containing a value wins, so overlapping registrations are allowed and
//! resolved by order.

use heapless::Vec;

use crate::error::ZoneError;

/// Caller-chosen zone identifier.
pub type ZoneId = u8;

/// Inclusive band `[min, max]` tagged with an id.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Zone {
    pub id: ZoneId,
    pub min: i32,
    pub max: i32,
}

impl Zone {
    pub fn new(id: ZoneId, min: i32, max: i32) -> Result<Self, ZoneError> {
        if min > max {
            return Err(ZoneError::InvalidRange { id, min, max });
        }
        Ok(Self { id, min, max })
    }

    #[inline]
    pub fn contains(&self, value: i32) -> bool {
        (self.min..=self.max).contains(&value)
    }
}

/// Zone change between two committed values.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ZoneTransition {
    pub from: Option<ZoneId>,
    pub to: Option<ZoneId>,
}

#[derive(Debug, Clone, Default)]
pub struct ZoneClassifier<const N: usize> {
    zones: Vec<Zone, N>,
    current: Option<ZoneId>,
    previous: Option<ZoneId>,
}

impl<const N: usize> ZoneClassifier<N> {
    pub fn new() -> Self {
        Self {
            zones: Vec::new(),
            current: None,
            previous: None,
        }
    }

    pub fn add(&mut self, zone: Zone) -> Result<(), ZoneError> {
        self.zones
            .push(zone)
            .map_err(|_| ZoneError::Full { capacity: N })
    }

    /// Remove every zone and forget the current zone.
    pub fn clear(&mut self) {
        self.zones.clear();
        self.current = None;
        self.previous = None;
    }

    /// First registered zone containing `value`.
    pub fn classify(&self, value: i32) -> Option<ZoneId> {
        self.zones.iter().find(|z| z.contains(value)).map(|z| z.id)
    }

    /// Record the zone of the initial committed value without reporting it.
    pub fn anchor(&mut self, value: i32) {
        if self.zones.is_empty() {
            return;
        }
        self.current = self.classify(value);
        self.previous = self.current;
    }

    /// Classify a newly committed value; returns the transition if the zone changed.
    pub fn observe(&mut self, value: i32) -> Option<ZoneTransition> {
        if self.zones.is_empty() {
            return None;
        }
        self.current = self.classify(value);
        if self.current == self.previous {
            return None;
        }
        let transition = ZoneTransition {
            from: self.previous,
            to: self.current,
        };
        self.previous = self.current;
        Some(transition)
    }

    pub fn current(&self) -> Option<ZoneId> {
        self.current
    }

    pub fn len(&self) -> usize {
        self.zones.len()
    }

    pub fn is_empty(&self) -> bool {
        self.zones.is_empty()
    }

    pub const fn capacity(&self) -> usize {
        N
    }

    pub fn zones(&self) -> &[Zone] {
        &self.zones
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn abc() -> ZoneClassifier<4> {
        let mut c = ZoneClassifier::new();
        c.add(Zone::new(0, 0, 68).unwrap()).unwrap();
        c.add(Zone::new(1, 69, 74).unwrap()).unwrap();
        c.add(Zone::new(2, 75, 100).unwrap()).unwrap();
        c
    }

    #[test]
    fn first_registered_match_wins() {
        let mut c = ZoneClassifier::<4>::new();
        c.add(Zone::new(7, 0, 50).unwrap()).unwrap();
        c.add(Zone::new(8, 40, 100).unwrap()).unwrap();
        assert_eq!(c.classify(45), Some(7));
        assert_eq!(c.classify(51), Some(8));
        assert_eq!(c.classify(101), None);
    }

    #[test]
    fn transitions_are_reported_once() {
        let mut c = abc();
        c.anchor(50);
        assert_eq!(c.current(), Some(0));
        assert_eq!(c.observe(60), None);
        assert_eq!(
            c.observe(70),
            Some(ZoneTransition {
                from: Some(0),
                to: Some(1)
            })
        );
        assert_eq!(c.observe(72), None);
        assert_eq!(
            c.observe(120),
            Some(ZoneTransition {
                from: Some(1),
                to: None
            })
        );
    }

    #[test]
    fn capacity_is_enforced() {
        let mut c = ZoneClassifier::<2>::new();
        c.add(Zone::new(0, 0, 1).unwrap()).unwrap();
        c.add(Zone::new(1, 2, 3).unwrap()).unwrap();
        assert_eq!(
            c.add(Zone::new(2, 4, 5).unwrap()),
            Err(ZoneError::Full { capacity: 2 })
        );
        assert_eq!(c.len(), 2);
    }

    #[test]
    fn inverted_bounds_are_rejected() {
        assert_eq!(
            Zone::new(3, 10, 5),
            Err(ZoneError::InvalidRange {
                id: 3,
                min: 10,
                max: 5
            })
        );
        assert!(Zone::new(3, 5, 5).is_ok());
    }

    #[test]
    fn empty_classifier_never_reports() {
        let mut c = ZoneClassifier::<4>::new();
        c.anchor(10);
        assert_eq!(c.observe(500), None);
        assert_eq!(c.current(), None);
    }

    #[test]
    fn clear_forgets_state() {
        let mut c = abc();
        c.anchor(80);
        c.clear();
        assert!(c.is_empty());
        assert_eq!(c.current(), None);
    }
}
