//! Province and city reference data.

use serde::{Deserialize, Serialize};

use apola_core::{CityId, ProvinceId};

/// A province from the shipping reference data.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, sqlx::FromRow)]
pub struct Province {
    pub id: ProvinceId,
    pub name: String,
}

/// A city or regency from the shipping reference data.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, sqlx::FromRow)]
pub struct City {
    pub id: CityId,
    pub province_id: ProvinceId,
    /// `Kabupaten` or `Kota`.
    pub city_type: String,
    pub name: String,
    pub postal_code: String,
}

impl City {
    /// Name including the regency/city prefix, e.g. `Kota Bandung`.
    #[must_use]
    pub fn display_name(&self) -> String {
        if self.city_type.is_empty() {
            self.name.clone()
        } else {
            format!("{} {}", self.city_type, self.name)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display_name() {
        let mut city = City {
            id: CityId::new(23),
            province_id: ProvinceId::new(9),
            city_type: "Kota".to_string(),
            name: "Bandung".to_string(),
            postal_code: "40111".to_string(),
        };
        assert_eq!(city.display_name(), "Kota Bandung");

        city.city_type.clear();
        assert_eq!(city.display_name(), "Bandung");
    }
}
