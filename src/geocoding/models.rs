use serde::Deserialize;

// response
//  ├── status            "OK" | "ZERO_RESULTS" | "REQUEST_DENIED" | ...
//  ├── error_message?
//  └── results[]
//       ├── formatted_address
//       ├── place_id
//       ├── address_components[]
//       │    ├── long_name
//       │    └── types[]
//       └── geometry
//            └── location
//                 ├── lat
//                 └── lng

#[derive(Debug, Deserialize)]
pub struct GeocodeResponse {
    pub status: String,
    #[serde(default)]
    pub error_message: Option<String>,
    #[serde(default)]
    pub results: Vec<GeocodeResult>,
}

#[derive(Debug, Deserialize)]
pub struct GeocodeResult {
    pub formatted_address: Option<String>,
    pub place_id: Option<String>,
    #[serde(default)]
    pub address_components: Vec<AddressComponent>,
    pub geometry: Option<Geometry>,
}

#[derive(Debug, Deserialize)]
pub struct AddressComponent {
    pub long_name: String,
    #[serde(default)]
    pub types: Vec<String>,
}

#[derive(Debug, Deserialize)]
pub struct Geometry {
    pub location: Location,
}

#[derive(Debug, Deserialize)]
pub struct Location {
    pub lat: f64,
    pub lng: f64,
}

impl GeocodeResult {
    /// `long_name` of the first component tagged with `kind`.
    pub fn component(&self, kind: &str) -> Option<String> {
        self.address_components
            .iter()
            .find(|c| c.types.iter().any(|t| t == kind))
            .map(|c| c.long_name.clone())
    }
}
