// src/main.rs
//
// Résolveur LaTeX — point d’entrée
// --------------------------------
// - natif : fenêtre eframe, journal console (RUST_LOG=resolveur_latex=debug)
// - wasm32 : WebRunner sur <canvas id="the_canvas_id"> (index.html)
//
// L’impl eframe::App vit dans src/app.rs.

#![cfg_attr(target_arch = "wasm32", allow(unused_imports))]

use eframe::egui;

mod app;
mod noyau;

use app::AppCalc;

const TITRE_APP: &str = "Résolveur LaTeX";

fn creer_app(_cc: &eframe::CreationContext<'_>) -> Box<dyn eframe::App> {
    Box::<AppCalc>::default()
}

#[cfg(not(target_arch = "wasm32"))]
fn main() -> eframe::Result<()> {
    // une ligne debug! par étape de résolution, warn! quand la borne coupe
    env_logger::init();

    let viewport = egui::ViewportBuilder::default()
        .with_title(TITRE_APP)
        .with_inner_size([560.0, 780.0])
        .with_min_inner_size([440.0, 640.0]);
    let options = eframe::NativeOptions {
        viewport,
        ..Default::default()
    };

    eframe::run_native(TITRE_APP, options, Box::new(|cc| Ok(creer_app(cc))))
}

// wasm32 : le démarrage passe par web::demarrer (wasm_bindgen start)
#[cfg(target_arch = "wasm32")]
fn main() {}

#[cfg(target_arch = "wasm32")]
mod web {
    use wasm_bindgen::{JsCast, JsValue};
    use web_sys::HtmlCanvasElement;

    use super::{creer_app, TITRE_APP};

    const CANVAS_ID: &str = "the_canvas_id";

    fn erreur_js(msg: &str) -> JsValue {
        JsValue::from_str(msg)
    }

    fn canvas(document: &web_sys::Document) -> Result<HtmlCanvasElement, JsValue> {
        document
            .get_element_by_id(CANVAS_ID)
            .ok_or_else(|| erreur_js("canvas introuvable (id attendu : the_canvas_id)"))?
            .dyn_into::<HtmlCanvasElement>()
            .map_err(|_| erreur_js("l’élément the_canvas_id n’est pas un <canvas>"))
    }

    #[wasm_bindgen::prelude::wasm_bindgen(start)]
    pub async fn demarrer() -> Result<(), JsValue> {
        let document = web_sys::window()
            .and_then(|w| w.document())
            .ok_or_else(|| erreur_js("document indisponible"))?;
        document.set_title(TITRE_APP);

        eframe::WebRunner::new()
            .start(
                canvas(&document)?,
                eframe::WebOptions::default(),
                Box::new(|cc| Ok(creer_app(cc))),
            )
            .await
    }
}
