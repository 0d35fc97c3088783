//! Shop address read model.

/// The shop's name and address, with region names resolved.
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct ShopAddress {
    pub name: String,
    pub details: String,
    pub city_type: String,
    pub city_name: String,
    pub postal_code: String,
    pub province_name: String,
}

impl ShopAddress {
    /// City line, e.g. `Kota Bandung, Jawa Barat 40111`.
    #[must_use]
    pub fn locality(&self) -> String {
        let city = if self.city_type.is_empty() {
            self.city_name.clone()
        } else {
            format!("{} {}", self.city_type, self.city_name)
        };

        if self.postal_code.is_empty() {
            format!("{city}, {}", self.province_name)
        } else {
            format!("{city}, {} {}", self.province_name, self.postal_code)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_locality() {
        let mut address = ShopAddress {
            name: "Apola Store".to_string(),
            details: "Jl. Asia Afrika No. 8".to_string(),
            city_type: "Kota".to_string(),
            city_name: "Bandung".to_string(),
            postal_code: "40111".to_string(),
            province_name: "Jawa Barat".to_string(),
        };
        assert_eq!(address.locality(), "Kota Bandung, Jawa Barat 40111");

        address.postal_code.clear();
        address.city_type.clear();
        assert_eq!(address.locality(), "Bandung, Jawa Barat");
    }
}
