// Bridge to the JavaScript model runtime.
//
// The page defines two globals, each returning a Promise:
//   doodleModelReady()                      resolves once the model is loaded
//   doodleClassify(width, height, rgba)     resolves to a class index, a label,
//                                           or { index | label, confidence }

use async_trait::async_trait;
use log::debug;
use wasm_bindgen::prelude::*;
use wasm_bindgen_futures::JsFuture;

use crate::catalog::Catalog;
use crate::classifier::{ClassifierPort, PredictionResult, RawPrediction, Snapshot};
use crate::error::ClassifierError;

#[wasm_bindgen]
extern "C" {
    #[wasm_bindgen(catch, js_name = doodleModelReady)]
    fn doodle_model_ready() -> Result<js_sys::Promise, JsValue>;

    #[wasm_bindgen(catch, js_name = doodleClassify)]
    fn doodle_classify(width: u32, height: u32, rgba: &[u8]) -> Result<js_sys::Promise, JsValue>;
}

pub struct JsClassifier {
    catalog: Catalog,
}

impl JsClassifier {
    pub fn new(catalog: Catalog) -> Self {
        Self { catalog }
    }
}

#[async_trait(?Send)]
impl ClassifierPort for JsClassifier {
    async fn ready(&self) -> Result<(), ClassifierError> {
        let promise = doodle_model_ready().map_err(|e| {
            debug!("doodleModelReady missing: {e:?}");
            ClassifierError::Unavailable
        })?;
        JsFuture::from(promise).await.map_err(|e| {
            debug!("model load rejected: {e:?}");
            ClassifierError::Unavailable
        })?;
        Ok(())
    }

    async fn classify(&self, snapshot: &Snapshot) -> Result<PredictionResult, ClassifierError> {
        let promise = doodle_classify(snapshot.width(), snapshot.height(), snapshot.rgba())
            .map_err(|e| {
                debug!("doodleClassify missing: {e:?}");
                ClassifierError::Unavailable
            })?;
        let value = JsFuture::from(promise)
            .await
            .map_err(|e| ClassifierError::Inference(format!("{e:?}")))?;
        decode_prediction(&value)?.resolve(&self.catalog)
    }
}

pub fn decode_prediction(value: &JsValue) -> Result<RawPrediction, ClassifierError> {
    if let Some(n) = value.as_f64() {
        return Ok(RawPrediction {
            index: Some(index_from_f64(n)?),
            ..Default::default()
        });
    }
    if let Some(label) = value.as_string() {
        return Ok(RawPrediction {
            label: Some(label),
            ..Default::default()
        });
    }
    if !value.is_object() {
        return Err(ClassifierError::Inference(format!(
            "unexpected prediction {value:?}"
        )));
    }
    let field = |name: &str| {
        js_sys::Reflect::get(value, &JsValue::from_str(name)).unwrap_or(JsValue::UNDEFINED)
    };
    let index = match field("index").as_f64() {
        Some(n) => Some(index_from_f64(n)?),
        None => None,
    };
    Ok(RawPrediction {
        index,
        label: field("label").as_string(),
        confidence: field("confidence").as_f64().map(|c| c as f32),
    })
}

fn index_from_f64(n: f64) -> Result<u32, ClassifierError> {
    if n >= 0.0 && n.fract() == 0.0 && n <= u32::MAX as f64 {
        Ok(n as u32)
    } else {
        Err(ClassifierError::Inference(format!("bad class index {n}")))
    }
}

#[cfg(all(test, target_arch = "wasm32"))]
mod tests {
    use super::*;
    use wasm_bindgen_test::*;

    #[wasm_bindgen_test]
    fn decodes_bare_index_and_label() {
        let raw = decode_prediction(&JsValue::from_f64(3.0)).unwrap();
        assert_eq!(raw.index, Some(3));
        let raw = decode_prediction(&JsValue::from_str("moon")).unwrap();
        assert_eq!(raw.label.as_deref(), Some("moon"));
        assert!(decode_prediction(&JsValue::from_f64(-1.0)).is_err());
        assert!(decode_prediction(&JsValue::NULL).is_err());
    }

    #[wasm_bindgen_test]
    fn decodes_object_with_confidence() {
        let obj = js_sys::Object::new();
        js_sys::Reflect::set(&obj, &"index".into(), &JsValue::from_f64(9.0)).unwrap();
        js_sys::Reflect::set(&obj, &"confidence".into(), &JsValue::from_f64(0.5)).unwrap();
        let raw = decode_prediction(&obj.into()).unwrap();
        assert_eq!(raw.index, Some(9));
        assert_eq!(raw.confidence, Some(0.5));
        let p = raw.resolve(&Catalog::builtin()).unwrap();
        assert_eq!(p.category.name, "moon");
    }
}
