//! Skill rating aggregation.
//!
//! A player's displayed rating blends their self-assessment with the peer
//! ratings submitted for them. The blend is pure arithmetic over six skill
//! dimensions, kept free of store access so it can be tested in isolation.

use chrono::Utc;
use futsalgo_common::{AppError, AppResult, IdGenerator};
use futsalgo_db::{
    entities::{peer_rating, user},
    repositories::{PeerRatingRepository, UserRepository},
};
use sea_orm::{ActiveValue, Set};
use serde::{Deserialize, Serialize};

/// Six-dimension skill vector.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RatingVector {
    pub shooting: f64,
    pub passing: f64,
    pub stamina: f64,
    pub physical: f64,
    pub dribbling: f64,
    pub defense: f64,
}

impl RatingVector {
    fn map2(&self, other: &Self, f: impl Fn(f64, f64) -> f64) -> Self {
        Self {
            shooting: f(self.shooting, other.shooting),
            passing: f(self.passing, other.passing),
            stamina: f(self.stamina, other.stamina),
            physical: f(self.physical, other.physical),
            dribbling: f(self.dribbling, other.dribbling),
            defense: f(self.defense, other.defense),
        }
    }
}

impl From<&peer_rating::Model> for RatingVector {
    fn from(model: &peer_rating::Model) -> Self {
        Self {
            shooting: model.shooting,
            passing: model.passing,
            stamina: model.stamina,
            physical: model.physical,
            dribbling: model.dribbling,
            defense: model.defense,
        }
    }
}

impl From<&user::Model> for RatingVector {
    fn from(model: &user::Model) -> Self {
        Self {
            shooting: model.self_shooting,
            passing: model.self_passing,
            stamina: model.self_stamina,
            physical: model.self_physical,
            dribbling: model.self_dribbling,
            defense: model.self_defense,
        }
    }
}

/// Component-wise sum of peer submissions plus the number of raters.
#[derive(Debug, Clone, PartialEq)]
pub struct RatingsAggregate {
    pub totals: RatingVector,
    pub rater_count: u64,
    pub has_ratings: bool,
}

impl RatingsAggregate {
    /// Build an aggregate; `has_ratings` is derived from the rater count.
    #[must_use]
    pub fn new(totals: RatingVector, rater_count: u64) -> Self {
        Self {
            totals,
            rater_count,
            has_ratings: rater_count > 0,
        }
    }

    /// Sum peer submissions into an aggregate.
    #[must_use]
    pub fn from_ratings(ratings: &[peer_rating::Model]) -> Self {
        let totals = ratings.iter().fold(RatingVector::default(), |acc, r| {
            acc.map2(&RatingVector::from(r), |a, b| a + b)
        });
        Self::new(totals, ratings.len() as u64)
    }
}

/// Blend a self-assessment with aggregated peer ratings.
///
/// Without peer ratings the self-assessment is displayed as-is. With peer
/// ratings, each dimension averages the peer total together with the
/// self-assessment, the subject counting as exactly one extra rater. No
/// rounding or clamping.
#[must_use]
pub fn compute_displayed_ratings(
    self_ratings: &RatingVector,
    aggregate: &RatingsAggregate,
) -> RatingVector {
    if !aggregate.has_ratings {
        return self_ratings.clone();
    }
    let divisor = (aggregate.rater_count + 1) as f64;
    aggregate
        .totals
        .map2(self_ratings, |total, own| (total + own) / divisor)
}

/// Rating service for submitting peer ratings and reading displayed ratings.
#[derive(Clone)]
pub struct RatingService {
    peer_rating_repo: PeerRatingRepository,
    user_repo: UserRepository,
    id_gen: IdGenerator,
}

impl RatingService {
    /// Create a new rating service.
    #[must_use]
    pub fn new(peer_rating_repo: PeerRatingRepository, user_repo: UserRepository) -> Self {
        Self {
            peer_rating_repo,
            user_repo,
            id_gen: IdGenerator::new(),
        }
    }

    /// Submit or replace a peer rating for a subject.
    ///
    /// A rater has at most one rating per subject; a second submission
    /// overwrites the first. Rating yourself is rejected, self-assessment
    /// lives on the user row.
    pub async fn submit_rating(
        &self,
        rater_id: &str,
        subject_id: &str,
        vector: &RatingVector,
    ) -> AppResult<peer_rating::Model> {
        if rater_id == subject_id {
            return Err(AppError::SelfReference);
        }
        self.user_repo.get_by_id(subject_id).await?;

        let now = Utc::now();
        match self.peer_rating_repo.find_by_pair(rater_id, subject_id).await? {
            Some(existing) => {
                let model = peer_rating::ActiveModel {
                    id: Set(existing.id),
                    rater_id: ActiveValue::NotSet,
                    subject_id: ActiveValue::NotSet,
                    shooting: Set(vector.shooting),
                    passing: Set(vector.passing),
                    stamina: Set(vector.stamina),
                    physical: Set(vector.physical),
                    dribbling: Set(vector.dribbling),
                    defense: Set(vector.defense),
                    created_at: ActiveValue::NotSet,
                    updated_at: Set(Some(now.into())),
                };
                self.peer_rating_repo.update(model).await
            }
            None => {
                let model = peer_rating::ActiveModel {
                    id: Set(self.id_gen.generate()),
                    rater_id: Set(rater_id.to_string()),
                    subject_id: Set(subject_id.to_string()),
                    shooting: Set(vector.shooting),
                    passing: Set(vector.passing),
                    stamina: Set(vector.stamina),
                    physical: Set(vector.physical),
                    dribbling: Set(vector.dribbling),
                    defense: Set(vector.defense),
                    created_at: Set(now.into()),
                    updated_at: ActiveValue::NotSet,
                };
                self.peer_rating_repo.create(model).await
            }
        }
    }

    /// Displayed ratings for a user already loaded by the caller.
    pub async fn displayed_ratings_for(&self, subject: &user::Model) -> AppResult<RatingVector> {
        let ratings = self.peer_rating_repo.find_by_subject(&subject.id).await?;
        let aggregate = RatingsAggregate::from_ratings(&ratings);
        Ok(compute_displayed_ratings(
            &RatingVector::from(subject),
            &aggregate,
        ))
    }

    /// Displayed ratings by subject id.
    pub async fn displayed_ratings(&self, subject_id: &str) -> AppResult<RatingVector> {
        let subject = self.user_repo.get_by_id(subject_id).await?;
        self.displayed_ratings_for(&subject).await
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use sea_orm::{DatabaseBackend, MockDatabase};
    use std::sync::Arc;

    fn uniform(value: f64) -> RatingVector {
        RatingVector {
            shooting: value,
            passing: value,
            stamina: value,
            physical: value,
            dribbling: value,
            defense: value,
        }
    }

    #[test]
    fn test_no_peer_ratings_is_identity() {
        let own = RatingVector {
            shooting: 7.0,
            passing: 6.5,
            stamina: 8.0,
            physical: 5.0,
            dribbling: 9.0,
            defense: 4.5,
        };
        let aggregate = RatingsAggregate::new(RatingVector::default(), 0);

        let displayed = compute_displayed_ratings(&own, &aggregate);

        assert_eq!(displayed, own);
    }

    #[test]
    fn test_all_zero_self_without_peers_stays_zero() {
        let own = uniform(0.0);
        let aggregate = RatingsAggregate::new(RatingVector::default(), 0);

        assert_eq!(compute_displayed_ratings(&own, &aggregate), uniform(0.0));
    }

    #[test]
    fn test_zero_totals_with_forced_flag_divides_by_one() {
        let own = RatingVector {
            shooting: 8.0,
            passing: 6.0,
            stamina: 7.0,
            physical: 5.0,
            dribbling: 9.0,
            defense: 4.0,
        };
        // has_ratings drives the branch even when counts disagree
        let aggregate = RatingsAggregate {
            totals: RatingVector::default(),
            rater_count: 0,
            has_ratings: true,
        };

        assert_eq!(compute_displayed_ratings(&own, &aggregate), own);
    }

    #[test]
    fn test_all_tens_self_with_one_zero_rater_halves() {
        let own = uniform(10.0);
        let aggregate = RatingsAggregate::new(RatingVector::default(), 1);

        assert_eq!(compute_displayed_ratings(&own, &aggregate), uniform(5.0));
    }

    #[test]
    fn test_blend_averages_per_dimension() {
        let own = RatingVector {
            shooting: 8.0,
            passing: 4.0,
            stamina: 6.0,
            physical: 2.0,
            dribbling: 10.0,
            defense: 0.0,
        };
        // Two raters: sums 10+6, 8+4, 6+6, 4+2, 2+10, 0+6
        let aggregate = RatingsAggregate::new(
            RatingVector {
                shooting: 16.0,
                passing: 12.0,
                stamina: 12.0,
                physical: 6.0,
                dribbling: 12.0,
                defense: 6.0,
            },
            2,
        );

        let displayed = compute_displayed_ratings(&own, &aggregate);

        assert_eq!(displayed.shooting, 8.0);
        assert_eq!(displayed.passing, (12.0 + 4.0) / 3.0);
        assert_eq!(displayed.stamina, 6.0);
        assert_eq!(displayed.physical, (6.0 + 2.0) / 3.0);
        assert_eq!(displayed.dribbling, (12.0 + 10.0) / 3.0);
        assert_eq!(displayed.defense, 2.0);
    }

    #[test]
    fn test_inputs_are_not_mutated() {
        let own = uniform(7.0);
        let aggregate = RatingsAggregate::new(uniform(3.0), 1);
        let own_before = own.clone();
        let aggregate_before = aggregate.clone();

        let _ = compute_displayed_ratings(&own, &aggregate);

        assert_eq!(own, own_before);
        assert_eq!(aggregate, aggregate_before);
    }

    #[test]
    fn test_aggregate_from_ratings_sums_components() {
        let make = |id: &str, shooting: f64| peer_rating::Model {
            id: id.to_string(),
            rater_id: format!("rater-{id}"),
            subject_id: "user1".to_string(),
            shooting,
            passing: 1.0,
            stamina: 2.0,
            physical: 3.0,
            dribbling: 4.0,
            defense: 5.0,
            created_at: Utc::now().into(),
            updated_at: None,
        };

        let aggregate = RatingsAggregate::from_ratings(&[make("r1", 6.0), make("r2", 8.0)]);

        assert_eq!(aggregate.rater_count, 2);
        assert!(aggregate.has_ratings);
        assert_eq!(aggregate.totals.shooting, 14.0);
        assert_eq!(aggregate.totals.passing, 2.0);
        assert_eq!(aggregate.totals.defense, 10.0);
    }

    #[test]
    fn test_aggregate_from_empty_slice() {
        let aggregate = RatingsAggregate::from_ratings(&[]);

        assert_eq!(aggregate.rater_count, 0);
        assert!(!aggregate.has_ratings);
        assert_eq!(aggregate.totals, RatingVector::default());
    }

    #[tokio::test]
    async fn test_submit_rating_rejects_self() {
        let db = Arc::new(MockDatabase::new(DatabaseBackend::Postgres).into_connection());
        let service = RatingService::new(
            PeerRatingRepository::new(Arc::clone(&db)),
            UserRepository::new(db),
        );

        let result = service
            .submit_rating("user1", "user1", &uniform(5.0))
            .await;

        assert!(matches!(result, Err(AppError::SelfReference)));
    }
}
