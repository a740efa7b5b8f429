//! # Draw Engine
//!
//! Picks the winning number and winner for a lottery.
//!
//! The number is drawn uniformly from the admissible set, i.e. the inclusive
//! range `[start, end]` minus the excluded numbers. Rejection sampling keeps
//! the distribution uniform without materializing the set, so huge ranges
//! cost nothing. The winner is an independent uniform pick over the
//! registered participants; the two outcomes are unrelated beyond sharing
//! one draw call.
//!
//! A caller may pass a fixed result. It is honored only when it lies in the
//! admissible set; anything else falls back to a random draw. The front end
//! uses this to persist the number its reveal animation already showed.

use std::collections::HashSet;

use rand::{seq::SliceRandom, Rng};

use crate::{error::AppError, lottery::Participant};

/// Winner value stored when a lottery is drawn with nobody registered.
pub const NO_PARTICIPANTS: &str = "no participants";

#[derive(Debug)]
pub struct DrawOutcome {
    pub result: i32,
    pub winner: String,
}

pub fn draw<R: Rng>(
    start: i32,
    end: i32,
    excluded: &[i32],
    participants: &[Participant],
    fixed_result: Option<i32>,
    rng: &mut R,
) -> Result<DrawOutcome, AppError> {
    if start >= end {
        return Err(AppError::InvalidRange);
    }

    let excluded: HashSet<i32> = excluded.iter().copied().collect();

    // Excluded values outside the range do not shrink the admissible set.
    let span = end as i64 - start as i64 + 1;
    let blocked = excluded
        .iter()
        .filter(|&&n| (start..=end).contains(&n))
        .count() as i64;
    if blocked >= span {
        return Err(AppError::NoAdmissibleNumbers);
    }

    let result = match fixed_result {
        Some(n) if (start..=end).contains(&n) && !excluded.contains(&n) => n,
        _ => loop {
            let candidate = rng.gen_range(start..=end);
            if !excluded.contains(&candidate) {
                break candidate;
            }
        },
    };

    let winner = participants
        .choose(rng)
        .map(|p| p.name.clone())
        .unwrap_or_else(|| NO_PARTICIPANTS.to_string());

    Ok(DrawOutcome { result, winner })
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use rand::{rngs::StdRng, SeedableRng};

    fn participant(name: &str) -> Participant {
        Participant {
            name: name.to_string(),
            phone: format!("555-{name}"),
            email: format!("{name}@example.com"),
            registration_date: Utc::now(),
        }
    }

    #[test]
    fn rejects_empty_and_inverted_ranges() {
        let mut rng = StdRng::seed_from_u64(1);

        assert!(matches!(
            draw(5, 5, &[], &[], None, &mut rng),
            Err(AppError::InvalidRange)
        ));
        assert!(matches!(
            draw(10, 1, &[], &[], None, &mut rng),
            Err(AppError::InvalidRange)
        ));
    }

    #[test]
    fn fails_when_everything_is_excluded() {
        let mut rng = StdRng::seed_from_u64(2);

        assert!(matches!(
            draw(1, 2, &[1, 2], &[], None, &mut rng),
            Err(AppError::NoAdmissibleNumbers)
        ));
    }

    #[test]
    fn out_of_range_exclusions_are_ignored() {
        let mut rng = StdRng::seed_from_u64(3);

        let outcome = draw(1, 2, &[0, 3, 99, -7], &[], None, &mut rng).unwrap();
        assert!((1..=2).contains(&outcome.result));
    }

    #[test]
    fn thousand_draws_stay_in_admissible_set() {
        let mut rng = StdRng::seed_from_u64(4);

        for _ in 0..1000 {
            let outcome = draw(1, 5, &[3], &[], None, &mut rng).unwrap();
            assert!([1, 2, 4, 5].contains(&outcome.result));
            assert_eq!(outcome.winner, NO_PARTICIPANTS);
        }
    }

    #[test]
    fn every_admissible_number_is_reachable() {
        let mut rng = StdRng::seed_from_u64(5);
        let mut seen = HashSet::new();

        for _ in 0..1000 {
            seen.insert(draw(1, 5, &[3], &[], None, &mut rng).unwrap().result);
        }

        assert_eq!(seen, HashSet::from([1, 2, 4, 5]));
    }

    #[test]
    fn admissible_fixed_result_is_used_verbatim() {
        let mut rng = StdRng::seed_from_u64(6);

        for _ in 0..20 {
            let outcome = draw(1, 10, &[2], &[], Some(7), &mut rng).unwrap();
            assert_eq!(outcome.result, 7);
        }
    }

    #[test]
    fn inadmissible_fixed_result_falls_back_to_random() {
        let mut rng = StdRng::seed_from_u64(7);

        // 3 is excluded, 42 is out of range; both must be overridden.
        for fixed in [Some(3), Some(42)] {
            let outcome = draw(1, 5, &[3], &[], fixed, &mut rng).unwrap();
            assert!([1, 2, 4, 5].contains(&outcome.result));
        }
    }

    #[test]
    fn winner_comes_from_the_participant_list() {
        let mut rng = StdRng::seed_from_u64(8);
        let participants = vec![participant("ada"), participant("bob"), participant("cyd")];

        for _ in 0..100 {
            let outcome = draw(1, 99, &[], &participants, None, &mut rng).unwrap();
            assert!(participants.iter().any(|p| p.name == outcome.winner));
        }
    }
}
