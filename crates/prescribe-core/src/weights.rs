//! Group weights and weighted random selection.
//!
//! Selection is split in two: [`Weights::pick`] is a pure function from a
//! ticket in `0..total` to a group, and a [`RandomSource`] supplies the ticket.
//! Tests inject a seeded or fixed source to make outcomes reproducible.

use std::sync::{Mutex, PoisonError};

use rand::{Rng, SeedableRng, rngs::StdRng};

use crate::{Error, Result, assignment::Group};

// ─── Weights ─────────────────────────────────────────────────────────────────

/// A non-negative weight for every [`Group`]. A weight of 0 excludes the
/// group from selection.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Weights {
  by_group: [u32; Group::ALL.len()],
}

impl Weights {
  pub fn new(a: u32, b: u32, c: u32) -> Self { Self { by_group: [a, b, c] } }

  /// Return a copy with `group`'s weight replaced.
  pub fn with(mut self, group: Group, weight: u32) -> Self {
    self.by_group[group.index()] = weight;
    self
  }

  pub fn get(&self, group: Group) -> u32 { self.by_group[group.index()] }

  /// Sum of all weights. Never overflows: three `u32`s fit in a `u64`.
  pub fn total(&self) -> u64 { self.by_group.iter().map(|&w| u64::from(w)).sum() }

  /// Fails with [`Error::InvalidWeights`] when no group can be drawn.
  pub fn validate(&self) -> Result<()> {
    if self.total() == 0 {
      return Err(Error::InvalidWeights(format!(
        "at least one group needs a positive weight (got {self})"
      )));
    }
    Ok(())
  }

  /// Map `ticket` (in `0..total`) to the group owning that slice of the
  /// cumulative weight range. Returns `None` when `ticket >= total`.
  pub fn pick(&self, ticket: u64) -> Option<Group> {
    let mut remaining = ticket;
    for group in Group::ALL {
      let weight = u64::from(self.get(group));
      if remaining < weight {
        return Some(group);
      }
      remaining -= weight;
    }
    None
  }
}

impl Default for Weights {
  fn default() -> Self { Self::new(1, 1, 1) }
}

impl std::fmt::Display for Weights {
  fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
    let [a, b, c] = self.by_group;
    write!(f, "A:{a}, B:{b}, C:{c}")
  }
}

// ─── Random sources ──────────────────────────────────────────────────────────

/// Supplies uniformly distributed tickets for [`choose_group`].
pub trait RandomSource: Send + Sync {
  /// Return a value uniformly distributed over `0..upper`. Callers never pass
  /// `upper == 0`.
  fn below(&self, upper: u64) -> u64;
}

/// Draws from the thread-local RNG. Holds no state of its own.
#[derive(Debug, Clone, Copy, Default)]
pub struct ThreadRandom;

impl RandomSource for ThreadRandom {
  fn below(&self, upper: u64) -> u64 { rand::thread_rng().gen_range(0..upper) }
}

/// A reproducible sequence seeded from a `u64`.
#[derive(Debug)]
pub struct SeededRandom(Mutex<StdRng>);

impl SeededRandom {
  pub fn new(seed: u64) -> Self { Self(Mutex::new(StdRng::seed_from_u64(seed))) }
}

impl RandomSource for SeededRandom {
  fn below(&self, upper: u64) -> u64 {
    self
      .0
      .lock()
      .unwrap_or_else(PoisonError::into_inner)
      .gen_range(0..upper)
  }
}

/// Draw one group with probability proportional to its weight.
pub fn choose_group<R>(weights: &Weights, source: &R) -> Result<Group>
where
  R: RandomSource + ?Sized,
{
  weights.validate()?;
  let ticket = source.below(weights.total());
  weights.pick(ticket).ok_or_else(|| {
    Error::InvalidWeights(format!("ticket {ticket} outside weights {weights}"))
  })
}

#[cfg(test)]
mod tests {
  use super::*;

  /// Always returns the same ticket, clamped into range.
  struct Fixed(u64);

  impl RandomSource for Fixed {
    fn below(&self, upper: u64) -> u64 { self.0.min(upper - 1) }
  }

  #[test]
  fn default_weights_are_equal() {
    let w = Weights::default();
    for group in Group::ALL {
      assert_eq!(w.get(group), 1);
    }
    assert_eq!(w.total(), 3);
  }

  #[test]
  fn pick_walks_cumulative_ranges() {
    let w = Weights::new(2, 0, 1);
    assert_eq!(w.pick(0), Some(Group::A));
    assert_eq!(w.pick(1), Some(Group::A));
    assert_eq!(w.pick(2), Some(Group::C));
    assert_eq!(w.pick(3), None);
  }

  #[test]
  fn all_zero_weights_are_invalid() {
    let err = choose_group(&Weights::new(0, 0, 0), &ThreadRandom).unwrap_err();
    assert!(matches!(err, Error::InvalidWeights(_)));
  }

  #[test]
  fn total_does_not_overflow() {
    let w = Weights::new(u32::MAX, u32::MAX, u32::MAX);
    assert_eq!(w.total(), 3 * u64::from(u32::MAX));
    assert_eq!(w.pick(w.total() - 1), Some(Group::C));
  }

  #[test]
  fn fixed_source_forces_outcome() {
    let w = Weights::default();
    assert_eq!(choose_group(&w, &Fixed(0)).unwrap(), Group::A);
    assert_eq!(choose_group(&w, &Fixed(1)).unwrap(), Group::B);
    assert_eq!(choose_group(&w, &Fixed(2)).unwrap(), Group::C);
  }

  #[test]
  fn single_positive_weight_always_wins() {
    let w = Weights::new(0, 0, 0).with(Group::B, 7);
    let source = SeededRandom::new(7);
    for _ in 0..500 {
      assert_eq!(choose_group(&w, &source).unwrap(), Group::B);
    }
  }

  #[test]
  fn zero_weight_group_is_never_drawn() {
    let w = Weights::new(1, 0, 1);
    let source = SeededRandom::new(42);
    let mut seen = [0usize; 3];
    for _ in 0..2_000 {
      seen[choose_group(&w, &source).unwrap().index()] += 1;
    }
    assert_eq!(seen[Group::B.index()], 0);
    assert!(seen[Group::A.index()] > 0);
    assert!(seen[Group::C.index()] > 0);
  }

  #[test]
  fn draws_follow_weights_roughly() {
    let w = Weights::new(3, 1, 0);
    let source = SeededRandom::new(1234);
    let n = 8_000;
    let a = (0..n)
      .filter(|_| choose_group(&w, &source).unwrap() == Group::A)
      .count();
    // Expected 6000; allow a wide band.
    assert!((5_400..=6_600).contains(&a), "A drawn {a} times");
  }

  #[test]
  fn seeded_sources_repeat() {
    let w = Weights::default();
    let first = SeededRandom::new(9);
    let second = SeededRandom::new(9);
    for _ in 0..50 {
      assert_eq!(
        choose_group(&w, &first).unwrap(),
        choose_group(&w, &second).unwrap()
      );
    }
  }
}
