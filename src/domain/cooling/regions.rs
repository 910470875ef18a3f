use serde::Serialize;

/// A climate region the dataset is sampled from.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Region {
    pub key: &'static str,
    pub name: &'static str,
    pub latitude: f64,
    pub longitude: f64,
    pub description: &'static str,
}

pub const REGIONS: &[Region] = &[
    Region {
        key: "mount_vernon",
        name: "Mount Vernon, OH",
        latitude: 40.3934,
        longitude: -82.4857,
        description: "Mild temperate",
    },
    Region {
        key: "phoenix",
        name: "Phoenix, AZ",
        latitude: 33.4484,
        longitude: -112.0740,
        description: "Hot desert",
    },
    Region {
        key: "miami",
        name: "Miami, FL",
        latitude: 25.7617,
        longitude: -80.1918,
        description: "Hot humid subtropical",
    },
    Region {
        key: "riyadh",
        name: "Riyadh, Saudi Arabia",
        latitude: 24.7136,
        longitude: 46.6753,
        description: "Extreme desert heat",
    },
    Region {
        key: "seattle",
        name: "Seattle, WA",
        latitude: 47.6062,
        longitude: -122.3321,
        description: "Cool marine, cloudy",
    },
    Region {
        key: "las_vegas",
        name: "Las Vegas, NV",
        latitude: 36.1699,
        longitude: -115.1398,
        description: "Hot arid desert",
    },
    Region {
        key: "houston",
        name: "Houston, TX",
        latitude: 29.7604,
        longitude: -95.3698,
        description: "Hot humid subtropical",
    },
    Region {
        key: "denver",
        name: "Denver, CO",
        latitude: 39.7392,
        longitude: -104.9903,
        description: "High altitude, dry",
    },
    Region {
        key: "los_angeles",
        name: "Los Angeles, CA",
        latitude: 34.0522,
        longitude: -118.2437,
        description: "Mediterranean climate",
    },
    Region {
        key: "chicago",
        name: "Chicago, IL",
        latitude: 41.8781,
        longitude: -87.6298,
        description: "Continental humid",
    },
    Region {
        key: "el_paso",
        name: "El Paso, TX",
        latitude: 31.7619,
        longitude: -106.4850,
        description: "Hot and dry desert near the Mexico border",
    },
    Region {
        key: "fresno",
        name: "Fresno, CA",
        latitude: 36.7378,
        longitude: -119.7871,
        description: "Hot dry valley with long summers",
    },
    Region {
        key: "tucson",
        name: "Tucson, AZ",
        latitude: 32.2226,
        longitude: -110.9747,
        description: "Extremely hot desert, high irradiance",
    },
    Region {
        key: "palm_springs",
        name: "Palm Springs, CA",
        latitude: 33.8303,
        longitude: -116.5453,
        description: "Desert resort area, high solar radiation",
    },
    Region {
        key: "las_cruces",
        name: "Las Cruces, NM",
        latitude: 32.3199,
        longitude: -106.7637,
        description: "Hot arid desert, strong sunlight",
    },
];

/// Regions used to train the high-irradiance model.
pub const TRAINING_REGION_KEYS: &[&str] = &[
    "mount_vernon",
    "phoenix",
    "miami",
    "riyadh",
    "seattle",
    "el_paso",
    "fresno",
    "tucson",
    "palm_springs",
    "las_cruces",
];

pub fn find_region(key: &str) -> Option<&'static Region> {
    REGIONS.iter().find(|r| r.key == key)
}

/// Resolves a comma separated list of keys; "all" selects every region.
pub fn select_regions(keys: &str) -> Result<Vec<&'static Region>, String> {
    if keys.trim().eq_ignore_ascii_case("all") {
        return Ok(REGIONS.iter().collect());
    }
    keys.split(',')
        .map(str::trim)
        .filter(|k| !k.is_empty())
        .map(|k| find_region(k).ok_or_else(|| format!("Unknown region: {}", k)))
        .collect()
}
