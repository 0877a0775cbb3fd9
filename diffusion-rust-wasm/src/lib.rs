use wasm_bindgen::prelude::*;
use diffusion_core::{CellKind, ComparisonHarness, HarnessConfig, Lattice, SourceMode};

#[wasm_bindgen]
pub struct Comparison {
    config: HarnessConfig,
    lattice: Lattice,
    inner: Option<ComparisonHarness>,
}

#[wasm_bindgen]
impl Comparison {
    #[wasm_bindgen(constructor)]
    pub fn new(
        width: usize,
        height: usize,
        coefficient: f64,
        steps: usize,
        concentration: f64,
        probe: usize,
    ) -> Result<Comparison, JsValue> {
        let config = HarnessConfig {
            width,
            height,
            coefficient,
            steps,
            concentration,
            probe,
            source_mode: SourceMode::Initial,
        };
        config.validate().map_err(to_js)?;
        let lattice = Lattice::new(width, height).map_err(to_js)?;
        Ok(Comparison { config, lattice, inner: None })
    }

    pub fn set_clamped(&mut self, clamped: bool) {
        self.config.source_mode = if clamped { SourceMode::Clamped } else { SourceMode::Initial };
    }

    pub fn add_vessel(&mut self, index: usize) -> Result<(), JsValue> {
        self.lattice.place(index, CellKind::Vessel).map_err(to_js)?;
        Ok(())
    }

    /// Seed both fields. Vessels added afterwards are ignored.
    pub fn initialize(&mut self) -> Result<(), JsValue> {
        let mut harness = ComparisonHarness::new(self.config.clone()).map_err(to_js)?;
        harness
            .initialize(&self.lattice.sites(CellKind::Vessel))
            .map_err(to_js)?;
        self.inner = Some(harness);
        Ok(())
    }

    pub fn width(&self) -> usize { self.config.width }
    pub fn height(&self) -> usize { self.config.height }

    pub fn is_done(&self) -> bool {
        self.inner
            .as_ref()
            .is_some_and(|h| h.reports().len() >= self.config.steps)
    }

    // Copy-based JS access for colour mapping
    pub fn explicit_field(&self) -> Vec<f64> {
        self.inner.as_ref().map(|h| h.field_a().values().to_vec()).unwrap_or_default()
    }
    pub fn adi_field(&self) -> Vec<f64> {
        self.inner.as_ref().map(|h| h.field_b().values().to_vec()).unwrap_or_default()
    }

    // Step + timing (WASM-only)
    pub fn step(&mut self) -> Result<StepInfo, JsValue> {
        let harness = self
            .inner
            .as_mut()
            .ok_or_else(|| JsValue::from_str("call initialize() first"))?;
        let t0 = now_ms();
        let report = harness.step().map_err(to_js)?;
        let t1 = now_ms();
        Ok(StepInfo {
            step: report.step,
            explicit: report.explicit,
            adi: report.adi,
            error: report.error,
            compute_ms: t1 - t0,
        })
    }
}

#[wasm_bindgen]
pub struct StepInfo {
    step: usize,
    explicit: f64,
    adi: f64,
    error: f64,
    compute_ms: f64,
}

#[wasm_bindgen]
impl StepInfo {
    pub fn step(&self) -> usize { self.step }
    pub fn explicit(&self) -> f64 { self.explicit }
    pub fn adi(&self) -> f64 { self.adi }
    pub fn error(&self) -> f64 { self.error }
    pub fn compute_ms(&self) -> f64 { self.compute_ms }
}

fn to_js(e: diffusion_core::DiffusionError) -> JsValue {
    JsValue::from_str(&e.to_string())
}

fn now_ms() -> f64 {
    web_sys::window()
        .and_then(|w| w.performance())
        .map(|p| p.now())
        .unwrap_or(0.0)
}
