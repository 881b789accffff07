//! Flavor lookup table spanning public and private flavors.

use crate::clients::{ClientError, ComputeService};
use crate::model::Flavor;
use std::collections::HashMap;

/// Flavors keyed by id. Private definitions shadow public ones.
#[derive(Debug, Clone, Default)]
pub struct FlavorCatalog {
    flavors: HashMap<String, Flavor>,
}

impl FlavorCatalog {
    /// Overlay the private listing on top of the public listing.
    pub fn from_listings(public: Vec<Flavor>, private: Vec<Flavor>) -> Self {
        let flavors = public
            .into_iter()
            .chain(private)
            .map(|f| (f.id.clone(), f))
            .collect();
        Self { flavors }
    }

    /// Fetch both listings from the compute service.
    pub async fn load(compute: &dyn ComputeService) -> Result<Self, ClientError> {
        let public = compute.list_flavors(true).await?;
        let private = compute.list_flavors(false).await?;
        tracing::debug!(
            public = public.len(),
            private = private.len(),
            "Loaded flavor catalog"
        );
        Ok(Self::from_listings(public, private))
    }

    pub fn get(&self, id: &str) -> Option<&Flavor> {
        self.flavors.get(id)
    }

    pub fn len(&self) -> usize {
        self.flavors.len()
    }

    pub fn is_empty(&self) -> bool {
        self.flavors.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn flavor(id: &str, vcpus: i64, ram: i64) -> Flavor {
        Flavor {
            id: id.to_string(),
            name: format!("f{}", id),
            vcpus,
            ram,
        }
    }

    #[test]
    fn test_private_overrides_public() {
        let catalog = FlavorCatalog::from_listings(
            vec![flavor("1", 1, 4096), flavor("2", 2, 8192)],
            vec![flavor("2", 16, 65536), flavor("3", 4, 16384)],
        );
        assert_eq!(catalog.len(), 3);
        assert_eq!(catalog.get("2").unwrap().vcpus, 16);
        assert_eq!(catalog.get("1").unwrap().ram, 4096);
        assert!(catalog.get("4").is_none());
    }

    #[test]
    fn test_empty_catalog() {
        let catalog = FlavorCatalog::from_listings(vec![], vec![]);
        assert!(catalog.is_empty());
    }
}
