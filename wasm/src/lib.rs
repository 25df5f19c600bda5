//! WebAssembly module for the Agrinfo dashboard
//!
//! Provides client-side computation for:
//! - Irrigation volume and tier
//! - Soil classification from texture fractions
//! - Fertilizer and pesticide advice
//! - Login / register / main page navigation

use rust_decimal::prelude::ToPrimitive;
use wasm_bindgen::prelude::*;

// Re-export shared types for use in JavaScript
pub use shared::models::*;
pub use shared::session::*;
pub use shared::types::*;
pub use shared::validation::*;

/// Initialize the WASM module
#[wasm_bindgen(start)]
pub fn init() {
    log("agrinfo-wasm ready");
}

fn log(message: &str) {
    #[cfg(target_arch = "wasm32")]
    web_sys::console::log_1(&JsValue::from_str(message));
    #[cfg(not(target_arch = "wasm32"))]
    let _ = message;
}

/// Recommended irrigation volume in mm from temperature and hourly rain
#[wasm_bindgen]
pub fn irrigation_volume_mm(
    temperature: f64,
    hourly_precipitation: Vec<f64>,
    current_precipitation: f64,
) -> f64 {
    recommend_irrigation(temperature, &hourly_precipitation, current_precipitation)
}

/// Tier message for an irrigation volume
#[wasm_bindgen]
pub fn irrigation_message(volume_mm: f64) -> String {
    IrrigationTier::from_volume(volume_mm).message().to_string()
}

/// Soil category name from texture fractions; NaN marks a missing fraction
#[wasm_bindgen]
pub fn classify_soil_texture(sand: f64, clay: f64, silt: f64) -> String {
    classify_soil(sand, clay, silt).to_string()
}

/// Fertilizer and pesticide advice as JSON `{"fertilizer", "pesticide"}`
#[wasm_bindgen]
pub fn crop_care_advice(vegetation_index: f64, soil: &str) -> Result<String, JsValue> {
    let soil: SoilCategory = soil
        .parse()
        .map_err(|e: UnknownSoilCategory| JsValue::from_str(&e.to_string()))?;
    let (fertilizer, pesticide) = recommend_fertilizer_and_pesticide(vegetation_index, soil);

    serde_json::to_string(&serde_json::json!({
        "fertilizer": fertilizer,
        "pesticide": pesticide,
    }))
    .map_err(|e| JsValue::from_str(&format!("Serialization failed: {}", e)))
}

/// Default price per kg for a catalog crop, 0 for unknown crops
#[wasm_bindgen]
pub fn default_price_per_kg(crop: &str) -> f64 {
    default_crop_price(crop)
        .and_then(|price| price.to_f64())
        .unwrap_or(0.0)
}

/// Page navigation for the single-page front end
#[wasm_bindgen]
pub struct PageRouter {
    page: Page,
}

#[wasm_bindgen]
impl PageRouter {
    #[wasm_bindgen(constructor)]
    pub fn new() -> PageRouter {
        PageRouter { page: Page::default() }
    }

    /// `login`, `register` or `main`
    pub fn current(&self) -> String {
        self.page.name().to_string()
    }

    pub fn username(&self) -> Option<String> {
        self.page.username().map(str::to_string)
    }

    pub fn login_succeeded(&mut self, username: &str) {
        self.apply(PageEvent::LoginSucceeded {
            username: username.to_string(),
        });
    }

    pub fn go_to_register(&mut self) {
        self.apply(PageEvent::GoToRegister);
    }

    pub fn registration_succeeded(&mut self) {
        self.apply(PageEvent::RegistrationSucceeded);
    }

    pub fn back_to_login(&mut self) {
        self.apply(PageEvent::BackToLogin);
    }

    pub fn logout(&mut self) {
        self.apply(PageEvent::Logout);
    }

    fn apply(&mut self, event: PageEvent) {
        let from = self.page.name();
        self.page = std::mem::take(&mut self.page).transition(event);
        log(&format!("page: {} -> {}", from, self.page.name()));
    }
}

impl Default for PageRouter {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_irrigation_volume() {
        // 30C with no rain: 25 + 10
        assert!((irrigation_volume_mm(30.0, vec![0.0; 24], 0.0) - 35.0).abs() < 1e-9);
        // Heavy rain clamps at zero
        assert_eq!(irrigation_volume_mm(20.0, vec![40.0, 40.0, 40.0], 0.0), 0.0);
        // Short series falls back to current precipitation
        assert!((irrigation_volume_mm(20.0, vec![1.0], 5.0) - 20.0).abs() < 1e-9);
    }

    #[test]
    fn test_irrigation_message() {
        assert_eq!(irrigation_message(41.0), "High water requirement! Your crop is stressed.");
        assert_eq!(irrigation_message(40.0), "Moderate water requirement.");
        assert_eq!(irrigation_message(10.0), "Low water requirement.");
    }

    #[test]
    fn test_classify_soil_texture() {
        assert_eq!(classify_soil_texture(60.0, 20.0, 20.0), "Sandy");
        assert_eq!(classify_soil_texture(20.0, 50.0, 30.0), "Clay");
        assert_eq!(classify_soil_texture(20.0, 30.0, 50.0), "Silty");
        assert_eq!(classify_soil_texture(f64::NAN, 30.0, 30.0), "Loamy");
    }

    #[test]
    fn test_crop_care_advice() {
        let json = crop_care_advice(0.45, "Sandy").unwrap();
        let value: serde_json::Value = serde_json::from_str(&json).unwrap();
        assert_eq!(
            value["fertilizer"],
            "High NPK mix (Urea, DAP, MOP) (Add extra organic matter & water)"
        );
        assert_eq!(value["pesticide"], "Broad-spectrum insecticide (e.g., Chlorpyrifos)");

        let json = crop_care_advice(0.8, "loamy").unwrap();
        let value: serde_json::Value = serde_json::from_str(&json).unwrap();
        assert_eq!(value["pesticide"], "No pesticide required");
    }

    #[test]
    fn test_default_price_per_kg() {
        assert_eq!(default_price_per_kg("Cotton"), 40.0);
        assert_eq!(default_price_per_kg("Rice"), 25.0);
        assert_eq!(default_price_per_kg("Millet"), 0.0);
    }

    #[test]
    fn test_page_router() {
        let mut router = PageRouter::new();
        assert_eq!(router.current(), "login");

        router.go_to_register();
        assert_eq!(router.current(), "register");
        router.registration_succeeded();
        assert_eq!(router.current(), "login");

        router.login_succeeded("ramesh");
        assert_eq!(router.current(), "main");
        assert_eq!(router.username().as_deref(), Some("ramesh"));

        // Not a valid move from the main page
        router.go_to_register();
        assert_eq!(router.current(), "main");

        router.logout();
        assert_eq!(router.current(), "login");
        assert_eq!(router.username(), None);
    }
}
