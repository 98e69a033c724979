use crate::models::Spot;

/// Keeps the spots whose location code contains `keyword`, ignoring case.
///
/// An empty keyword keeps every spot.
pub fn filter_spots(spots: &[Spot], keyword: &str) -> Vec<Spot> {
    let keyword = keyword.to_lowercase();
    spots
        .iter()
        .filter(|spot| spot.location_code.to_lowercase().contains(&keyword))
        .cloned()
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_filter_case_insensitive() {
        let spots = create_spots();
        let filtered = filter_spots(&spots, "NEWPORT");

        assert_eq!(filtered.len(), 2);
        assert!(filtered.iter().all(|s| s.location_code.to_lowercase().contains("newport")));
    }

    #[test]
    fn test_filter_empty_keyword_returns_all() {
        let spots = create_spots();
        assert_eq!(filter_spots(&spots, ""), spots);
    }

    #[test]
    fn test_filter_no_match() {
        let spots = create_spots();
        assert!(filter_spots(&spots, "malibu").is_empty());
    }

    #[test]
    fn test_filter_is_subset_in_input_order() {
        let spots = create_spots();
        let filtered = filter_spots(&spots, "point");

        assert_eq!(filtered.len(), 2);
        assert_eq!(filtered[0].spot_id, 2);
        assert_eq!(filtered[1].spot_id, 3);
        assert!(filtered.iter().all(|s| spots.contains(s)));
    }

    // Helper functions for tests
    fn create_spots() -> Vec<Spot> {
        [
            (1, "Blackies", "newport-blackies"),
            (2, "Newport Point", "Newport-Point"),
            (3, "Dana Point", "dana-point"),
        ]
        .into_iter()
        .map(|(id, name, code)| Spot {
            spot_id: id,
            spot_name: name.to_string(),
            location_code: code.to_string(),
            coordinates: vec![-117.9, 33.6],
            county_id: None,
            street_address: None,
        })
        .collect()
    }
}
