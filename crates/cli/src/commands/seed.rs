//! Seed reference data.
//!
//! Provinces and cities come from a YAML file shaped like:
//!
//! ```yaml
//! provinces:
//!   - id: 9
//!     name: Jawa Barat
//!     cities:
//!       - id: 23
//!         type: Kota
//!         name: Bandung
//!         postal_code: "40111"
//! ```
//!
//! Rows are upserted by id, so the command can be re-run after the file
//! changes.

use std::collections::HashSet;
use std::path::Path;

use serde::Deserialize;
use thiserror::Error;
use tracing::info;

use apola_admin::db::{self, RegionRepository, RepositoryError};
use apola_admin::models::{City, Province};
use apola_core::{CityId, ProvinceId};

use super::{MissingDatabaseUrl, database_url};

/// Errors that can occur while seeding.
#[derive(Debug, Error)]
pub enum SeedError {
    #[error(transparent)]
    MissingEnvVar(#[from] MissingDatabaseUrl),

    #[error("Failed to read {path}: {source}")]
    Io {
        path: String,
        source: std::io::Error,
    },

    #[error("Invalid YAML: {0}")]
    Yaml(#[from] serde_yaml::Error),

    #[error("Invalid regions file: {0}")]
    Invalid(String),

    #[error("Database connection error: {0}")]
    Connect(#[from] sqlx::Error),

    #[error(transparent)]
    Repository(#[from] RepositoryError),
}

/// Top level of the regions file.
#[derive(Debug, Deserialize)]
pub struct RegionsFile {
    pub provinces: Vec<ProvinceEntry>,
}

/// A province and its cities.
#[derive(Debug, Deserialize)]
pub struct ProvinceEntry {
    pub id: i32,
    pub name: String,
    #[serde(default)]
    pub cities: Vec<CityEntry>,
}

/// A city within a province.
#[derive(Debug, Deserialize)]
pub struct CityEntry {
    pub id: i32,
    /// `Kabupaten` or `Kota`.
    #[serde(rename = "type")]
    pub city_type: String,
    pub name: String,
    #[serde(default)]
    pub postal_code: String,
}

impl RegionsFile {
    /// Parse and check a regions file.
    ///
    /// # Errors
    ///
    /// Returns `SeedError::Yaml` for malformed YAML and `SeedError::Invalid`
    /// for ids below 1, duplicate ids or blank names.
    pub fn parse(content: &str) -> Result<Self, SeedError> {
        let file: Self = serde_yaml::from_str(content)?;
        file.check()?;
        Ok(file)
    }

    fn check(&self) -> Result<(), SeedError> {
        let mut province_ids = HashSet::new();
        let mut city_ids = HashSet::new();

        for province in &self.provinces {
            if province.id < 1 {
                return Err(SeedError::Invalid(format!(
                    "province id must be positive, got {}",
                    province.id
                )));
            }
            if !province_ids.insert(province.id) {
                return Err(SeedError::Invalid(format!(
                    "duplicate province id {}",
                    province.id
                )));
            }
            if province.name.trim().is_empty() {
                return Err(SeedError::Invalid(format!(
                    "province {} has no name",
                    province.id
                )));
            }

            for city in &province.cities {
                if city.id < 1 {
                    return Err(SeedError::Invalid(format!(
                        "city id must be positive, got {}",
                        city.id
                    )));
                }
                if !city_ids.insert(city.id) {
                    return Err(SeedError::Invalid(format!("duplicate city id {}", city.id)));
                }
                if city.name.trim().is_empty() {
                    return Err(SeedError::Invalid(format!("city {} has no name", city.id)));
                }
            }
        }

        Ok(())
    }

    /// Rows to upsert, provinces before their cities.
    #[must_use]
    pub fn into_rows(self) -> Vec<(Province, Vec<City>)> {
        self.provinces
            .into_iter()
            .map(|entry| {
                let province_id = ProvinceId::new(entry.id);
                let cities = entry
                    .cities
                    .into_iter()
                    .map(|city| City {
                        id: CityId::new(city.id),
                        province_id,
                        city_type: city.city_type.trim().to_owned(),
                        name: city.name.trim().to_owned(),
                        postal_code: city.postal_code.trim().to_owned(),
                    })
                    .collect();
                let province = Province {
                    id: province_id,
                    name: entry.name.trim().to_owned(),
                };
                (province, cities)
            })
            .collect()
    }
}

/// Upsert provinces and cities from `path`.
///
/// The file is read and checked before connecting to the database.
///
/// # Errors
///
/// Returns an error if the file is unreadable or invalid, or a write fails.
pub async fn regions(path: &Path) -> Result<(), SeedError> {
    info!(path = %path.display(), "Loading regions");

    let content = tokio::fs::read_to_string(path)
        .await
        .map_err(|source| SeedError::Io {
            path: path.display().to_string(),
            source,
        })?;
    let file = RegionsFile::parse(&content)?;

    let database_url = database_url()?;
    let pool = db::create_pool(&database_url).await?;
    info!("Connected to database");

    let repo = RegionRepository::new(&pool);
    let (mut provinces, mut cities) = (0_usize, 0_usize);

    for (province, province_cities) in file.into_rows() {
        repo.upsert_province(&province).await?;
        provinces += 1;

        for city in &province_cities {
            repo.upsert_city(city).await?;
            cities += 1;
        }
    }

    let (total_provinces, total_cities) = repo.count().await?;
    info!(
        provinces,
        cities, total_provinces, total_cities, "Regions seeded"
    );

    Ok(())
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    const SAMPLE: &str = r#"
provinces:
  - id: 9
    name: " Jawa Barat "
    cities:
      - id: 23
        type: Kota
        name: Bandung
        postal_code: "40111"
      - id: 22
        type: Kabupaten
        name: Bandung
  - id: 6
    name: DKI Jakarta
"#;

    #[test]
    fn test_parse_regions() {
        let rows = RegionsFile::parse(SAMPLE).unwrap().into_rows();
        assert_eq!(rows.len(), 2);

        let (province, cities) = &rows[0];
        assert_eq!(province.id, ProvinceId::new(9));
        assert_eq!(province.name, "Jawa Barat");
        assert_eq!(cities.len(), 2);
        assert_eq!(cities[0].display_name(), "Kota Bandung");
        assert_eq!(cities[0].province_id, ProvinceId::new(9));
        assert_eq!(cities[1].postal_code, "");

        assert!(rows[1].1.is_empty());
    }

    #[test]
    fn test_duplicate_city_id_is_rejected() {
        let yaml = r"
provinces:
  - id: 9
    name: Jawa Barat
    cities:
      - { id: 23, type: Kota, name: Bandung }
  - id: 10
    name: Jawa Tengah
    cities:
      - { id: 23, type: Kota, name: Semarang }
";
        let err = RegionsFile::parse(yaml).unwrap_err();
        assert_eq!(
            err.to_string(),
            "Invalid regions file: duplicate city id 23"
        );
    }

    #[test]
    fn test_non_positive_ids_are_rejected() {
        let err = RegionsFile::parse("provinces:\n  - { id: 0, name: Aceh }\n").unwrap_err();
        assert_eq!(
            err.to_string(),
            "Invalid regions file: province id must be positive, got 0"
        );

        let yaml = r"
provinces:
  - id: 9
    name: Jawa Barat
    cities:
      - { id: -4, type: Kota, name: Bandung }
";
        let err = RegionsFile::parse(yaml).unwrap_err();
        assert_eq!(
            err.to_string(),
            "Invalid regions file: city id must be positive, got -4"
        );
    }

    #[test]
    fn test_blank_province_name_is_rejected() {
        let yaml = "provinces:\n  - { id: 1, name: \"  \" }\n";
        assert!(matches!(
            RegionsFile::parse(yaml),
            Err(SeedError::Invalid(_))
        ));
    }

    #[test]
    fn test_malformed_yaml() {
        assert!(matches!(
            RegionsFile::parse("provinces: 12"),
            Err(SeedError::Yaml(_))
        ));
    }
}
