use std::collections::HashSet;

use uuid::Uuid;

use crate::domain::rental::Rental;

/// Equipment ids referenced by any active rental.
///
/// Recomputed on every call; there is no cache to invalidate, so the
/// view can never go stale against the record set it was derived from.
pub fn rented_equipment_ids(rentals: &[Rental]) -> HashSet<Uuid> {
    rentals
        .iter()
        .filter(|rental| rental.is_active())
        .flat_map(|rental| rental.equipment_ids.iter().copied())
        .collect()
}

pub fn is_rented(equipment_id: Uuid, rentals: &[Rental]) -> bool {
    rentals
        .iter()
        .any(|rental| rental.is_active() && rental.references_equipment(equipment_id))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{LifecycleState, Period, Rental};
    use chrono::NaiveDate;
    use rust_decimal::Decimal;

    fn rental_for(equipment_ids: Vec<Uuid>) -> Rental {
        Rental::new(
            Uuid::new_v4(),
            equipment_ids,
            Period::Daily,
            Decimal::from(50),
            NaiveDate::from_ymd_opt(2024, 5, 1).unwrap(),
            NaiveDate::from_ymd_opt(2024, 5, 2).unwrap(),
        )
    }

    #[test]
    fn active_rentals_mark_their_equipment_as_rented() {
        let rented_id = Uuid::new_v4();
        let free_id = Uuid::new_v4();
        let rentals = vec![rental_for(vec![rented_id])];

        assert!(is_rented(rented_id, &rentals));
        assert!(!is_rented(free_id, &rentals));
        assert_eq!(rented_equipment_ids(&rentals), HashSet::from([rented_id]));
    }

    #[test]
    fn finalized_rentals_release_their_equipment() {
        let equipment_id = Uuid::new_v4();
        let mut rental = rental_for(vec![equipment_id]);
        rental.lifecycle = LifecycleState::Finalized;

        let rentals = vec![rental];
        assert!(!is_rented(equipment_id, &rentals));
        assert!(rented_equipment_ids(&rentals).is_empty());
    }

    #[test]
    fn every_item_of_a_multi_equipment_rental_counts() {
        let first = Uuid::new_v4();
        let second = Uuid::new_v4();
        let rentals = vec![rental_for(vec![first, second])];

        let rented = rented_equipment_ids(&rentals);
        assert!(rented.contains(&first));
        assert!(rented.contains(&second));
    }
}
