//! Built-in engine catalog.
//!
//! Registration order matters: it breaks ties between equally scored
//! profiles. Engine-specific profiles come first; the vanilla WebGL and
//! Canvas 2D profiles come last so a recognised engine always wins a tie
//! against them.
//!
//! Signatures favour a few highly discriminating checks per profile. Every
//! signature weighs the same, so a weak signature costs as much as it
//! gains.

use crate::capability::{CapabilityProber, CapabilityRecord};
use crate::profiles::catalog::{AnalysisError, DeepAnalysis, EngineProfile};
use crate::signature::Signature;
use crate::snapshot::model::DocumentSnapshot;

/// Texture size below which large atlases fail to upload on most engines.
const MIN_COMFORTABLE_TEXTURE_SIZE: u32 = 4096;

pub fn profiles() -> Vec<EngineProfile> {
    vec![
        unity(),
        godot(),
        construct3(),
        gamemaker(),
        defold(),
        playcanvas(),
        babylonjs(),
        threejs(),
        phaser(),
        pixijs(),
        pico8(),
        emscripten(),
        vanilla_webgl(),
        vanilla_canvas2d(),
    ]
}

fn unity() -> EngineProfile {
    EngineProfile::new("unity", "Unity WebGL")
        .signature(Signature::script(["UnityLoader", "createUnityInstance", ".loader.js"]))
        .signature(Signature::dom(["unity-canvas", "unity-container", "gameContainer"]))
        .signature(Signature::webgl())
        .feature(
            "unity-legacy-loader",
            Signature::script(["UnityLoader.instantiate"]),
        )
        .feature(
            "compressed-build",
            Signature::script([".data.br", ".wasm.br", ".data.gz", ".unityweb"]),
        )
        .recommend("Enable Brotli compression and serve files with Content-Encoding: br")
        .recommend("Raise Managed Stripping Level to shrink the generated WebAssembly")
        .recommend("Use ASTC or ETC2 texture compression for mobile targets")
        .recommend("Enable Data Caching so the .data bundle is kept in IndexedDB")
        .recommend("Keep the initial memory size small and rely on memory growth")
        .deep_analysis(UnityAnalysis)
}

struct UnityAnalysis;

impl DeepAnalysis for UnityAnalysis {
    fn analyze(
        &self,
        snapshot: &DocumentSnapshot,
        prober: &dyn CapabilityProber,
    ) -> Result<Vec<String>, AnalysisError> {
        let mut warnings = Vec::new();

        if snapshot.scripts_contain("UnityLoader") {
            warnings.push(
                "Legacy UnityLoader.js detected; migrate to the createUnityInstance loader"
                    .to_string(),
            );
        }

        if let Some(caps) = probe_first(snapshot, prober)? {
            if !caps.webgl2 {
                warnings.push(
                    "WebGL 2 is unavailable; Unity 2023 and newer builds will not start"
                        .to_string(),
                );
            }
            texture_size_warning(&caps, MIN_COMFORTABLE_TEXTURE_SIZE, &mut warnings);
        }

        warnings.extend(accessibility_warnings(snapshot));
        Ok(warnings)
    }
}

fn godot() -> EngineProfile {
    EngineProfile::new("godot", "Godot Engine")
        .signature(Signature::script(["GODOT_CONFIG", "godot.js", "new Engine("]))
        .signature(Signature::dom(["status-progress", "status-notice", "status-indeterminate"]))
        .signature(Signature::webgl())
        .feature(
            "threads",
            Signature::script(["SharedArrayBuffer", "coi-serviceworker"]),
        )
        .feature("godot-pck", Signature::script([".pck"]))
        .recommend("Serve COOP and COEP headers when exporting with thread support")
        .recommend("Use the Compatibility renderer for the widest browser coverage")
        .recommend("Enable VRAM texture compression for desktop and mobile")
        .recommend("Pre-compress the .pck and .wasm files and serve them compressed")
        .deep_analysis(GodotAnalysis)
}

struct GodotAnalysis;

impl DeepAnalysis for GodotAnalysis {
    fn analyze(
        &self,
        snapshot: &DocumentSnapshot,
        prober: &dyn CapabilityProber,
    ) -> Result<Vec<String>, AnalysisError> {
        let mut warnings = Vec::new();

        if let Some(caps) = probe_first(snapshot, prober)? {
            if !caps.webgl2 {
                warnings.push(
                    "WebGL 2 is unavailable; Godot 4 web exports require WebGL 2".to_string(),
                );
            }
            if !caps.float_textures {
                warnings.push(
                    "Float textures are unsupported; HDR 2D and float post-processing are off"
                        .to_string(),
                );
            }
        }

        warnings.extend(accessibility_warnings(snapshot));
        Ok(warnings)
    }
}

fn construct3() -> EngineProfile {
    EngineProfile::new("construct3", "Construct 3")
        .signature(Signature::script(["c3runtime.js", "c3main.js", "scripts/main.js"]))
        .signature(Signature::html(["Construct 3", "construct.net"]))
        .signature(Signature::canvas_present())
        .feature(
            "c3-worker",
            Signature::script(["c3runtime-worker", "dispatchworker.js"]),
        )
        .recommend("Enable the 'Use worker' setting so the runtime renders off the main thread")
        .recommend("Use the 'Scale outer' fullscreen mode to avoid letterboxing on mobile")
        .recommend("Keep spritesheet size at 2048 or below for older mobile GPUs")
        .recommend("Set audio to load on demand for large music tracks")
        .deep_analysis(Construct3Analysis)
}

struct Construct3Analysis;

impl DeepAnalysis for Construct3Analysis {
    fn analyze(
        &self,
        snapshot: &DocumentSnapshot,
        prober: &dyn CapabilityProber,
    ) -> Result<Vec<String>, AnalysisError> {
        let mut warnings = Vec::new();

        if snapshot.canvases().iter().any(|c| !c.style.touch_action_none) {
            warnings.push(
                "Canvas lacks touch-action: none; touch gestures may scroll the page".to_string(),
            );
        }

        if let Some(caps) = probe_first(snapshot, prober)? {
            if !caps.webgl2 {
                warnings.push("Running on WebGL 1; some effects fall back".to_string());
            }
            texture_size_warning(&caps, 2048, &mut warnings);
        }

        Ok(warnings)
    }
}

fn gamemaker() -> EngineProfile {
    EngineProfile::new("gamemaker", "GameMaker")
        .signature(Signature::script(["GameMaker_Init", "html5game/"]))
        .signature(Signature::dom(["gm4html5_div_id", "gm4html5_div_class"]))
        .signature(Signature::html(["GameMaker"]))
        .recommend("Set 'Use WebGL' to Required in the HTML5 options so shaders work")
        .recommend("Keep texture pages at 2048x2048 for mobile compatibility")
        .recommend("Disable 'Interpolate colours between pixels' for pixel-art games")
        .deep_analysis(GameMakerAnalysis)
}

struct GameMakerAnalysis;

impl DeepAnalysis for GameMakerAnalysis {
    fn analyze(
        &self,
        snapshot: &DocumentSnapshot,
        prober: &dyn CapabilityProber,
    ) -> Result<Vec<String>, AnalysisError> {
        let mut warnings = Vec::new();

        if let Some(caps) = probe_first(snapshot, prober)? {
            texture_size_warning(&caps, 2048, &mut warnings);
        }

        warnings.extend(accessibility_warnings(snapshot));
        Ok(warnings)
    }
}

fn defold() -> EngineProfile {
    EngineProfile::new("defold", "Defold")
        .signature(Signature::script(["dmloader.js", "EngineLoader", "Progress.updateProgress"]))
        .signature(Signature::dom(["canvas-app-container", "app-container"]))
        .signature(Signature::canvas(["canvas-app-canvas"]))
        .recommend("Split bundle resources with live update to shorten the first load")
        .recommend("Use texture compression profiles for web targets")
        .recommend("Set the engine's heap size to the smallest value the game tolerates")
        .deep_analysis(DefoldAnalysis)
}

struct DefoldAnalysis;

impl DeepAnalysis for DefoldAnalysis {
    fn analyze(
        &self,
        snapshot: &DocumentSnapshot,
        prober: &dyn CapabilityProber,
    ) -> Result<Vec<String>, AnalysisError> {
        let mut warnings = Vec::new();

        let Some(caps) = probe_first(snapshot, prober)? else {
            return Ok(warnings);
        };
        if !caps.webgl2 && !caps.instanced_arrays {
            warnings.push(
                "ANGLE_instanced_arrays is missing on WebGL 1; instancing is disabled".to_string(),
            );
        }

        Ok(warnings)
    }
}

fn playcanvas() -> EngineProfile {
    EngineProfile::new("playcanvas", "PlayCanvas")
        .signature(Signature::script(["playcanvas", "pc.Application", "__start__.js"]))
        .signature(Signature::dom(["application-canvas"]))
        .signature(Signature::webgl())
        .feature(
            "playcanvas-loading-screen",
            Signature::script(["__loading__.js"]),
        )
        .recommend("Compress textures with Basis Universal so each GPU gets a native format")
        .recommend("Mark only critical assets as preload to shorten the loading screen")
        .recommend("Group static meshes into batch groups to cut draw calls")
        .recommend("Disable 'Use device pixel ratio' unless the art needs it")
        .deep_analysis(PlayCanvasAnalysis)
}

struct PlayCanvasAnalysis;

impl DeepAnalysis for PlayCanvasAnalysis {
    fn analyze(
        &self,
        snapshot: &DocumentSnapshot,
        prober: &dyn CapabilityProber,
    ) -> Result<Vec<String>, AnalysisError> {
        let mut warnings = Vec::new();

        if let Some(caps) = probe_first(snapshot, prober)? {
            if !caps.webgl2 && !caps.instanced_arrays {
                warnings.push(
                    "Hardware instancing is unavailable on this WebGL 1 context".to_string(),
                );
            }
            anisotropy_warning(&caps, &mut warnings);
        }

        Ok(warnings)
    }
}

fn babylonjs() -> EngineProfile {
    EngineProfile::new("babylonjs", "Babylon.js")
        .signature(Signature::script(["babylon.js", "babylon.max.js", "BABYLON.Engine"]))
        .signature(Signature::dom(["renderCanvas"]))
        .signature(Signature::webgl())
        .feature("inspector", Signature::script(["babylon.inspector"]))
        .recommend("Call scene.freezeActiveMeshes() for static scenes")
        .recommend("Use KTX2 compressed textures")
        .recommend("Prefer thin instances for large numbers of repeated meshes")
        .recommend("Set engine.enableOfflineSupport = false when no .manifest files exist")
        .deep_analysis(BabylonAnalysis)
}

struct BabylonAnalysis;

impl DeepAnalysis for BabylonAnalysis {
    fn analyze(
        &self,
        snapshot: &DocumentSnapshot,
        prober: &dyn CapabilityProber,
    ) -> Result<Vec<String>, AnalysisError> {
        let mut warnings = Vec::new();

        if let Some(caps) = probe_first(snapshot, prober)? {
            if !caps.webgl2 {
                warnings.push(
                    "WebGL 1 fallback: multisampled render targets are unavailable".to_string(),
                );
            }
            texture_size_warning(&caps, MIN_COMFORTABLE_TEXTURE_SIZE, &mut warnings);
        }

        Ok(warnings)
    }
}

fn threejs() -> EngineProfile {
    EngineProfile::new("threejs", "three.js")
        .signature(Signature::script(["three.module.js", "three.min.js", "THREE.WebGLRenderer"]))
        .signature(Signature::webgl())
        .feature("gltf-loader", Signature::script(["GLTFLoader"]))
        .feature("draco", Signature::script(["DRACOLoader"]))
        .recommend("Dispose of geometries, materials and textures that leave the scene")
        .recommend("Use InstancedMesh for repeated objects")
        .recommend("Cap renderer.setPixelRatio at Math.min(devicePixelRatio, 2)")
        .recommend("Compress glTF assets with Draco or meshopt")
        .deep_analysis(ThreeAnalysis)
}

struct ThreeAnalysis;

impl DeepAnalysis for ThreeAnalysis {
    fn analyze(
        &self,
        snapshot: &DocumentSnapshot,
        prober: &dyn CapabilityProber,
    ) -> Result<Vec<String>, AnalysisError> {
        let mut warnings = Vec::new();

        if snapshot.scripts_contain("setPixelRatio(window.devicePixelRatio)") {
            warnings.push(
                "setPixelRatio uses the raw devicePixelRatio; cap it on high-DPI screens"
                    .to_string(),
            );
        }

        if let Some(caps) = probe_first(snapshot, prober)? {
            anisotropy_warning(&caps, &mut warnings);
            if !caps.float_textures {
                warnings.push(
                    "Float textures are unsupported; FloatType render targets will fail"
                        .to_string(),
                );
            }
        }

        Ok(warnings)
    }
}

fn phaser() -> EngineProfile {
    EngineProfile::new("phaser", "Phaser")
        .signature(Signature::script(["phaser.min.js", "phaser.js", "Phaser.Game"]))
        .signature(Signature::canvas_present())
        .feature("arcade-physics", Signature::script(["arcade"]))
        .feature("matter-physics", Signature::script(["matter"]))
        .recommend("Pack sprites into texture atlases")
        .recommend("Set pixelArt: true in the game config for pixel-art games")
        .recommend("Use type: Phaser.AUTO so WebGL is preferred with a Canvas fallback")
        .recommend("Pool frequently created game objects instead of destroying them")
        .deep_analysis(PhaserAnalysis)
}

struct PhaserAnalysis;

impl DeepAnalysis for PhaserAnalysis {
    fn analyze(
        &self,
        snapshot: &DocumentSnapshot,
        _prober: &dyn CapabilityProber,
    ) -> Result<Vec<String>, AnalysisError> {
        let mut warnings = Vec::new();

        let stretched = snapshot.canvases().iter().any(|c| c.style.fills_viewport);
        if stretched && !snapshot.scripts_contain("Phaser.Scale") {
            warnings.push(
                "Canvas is stretched to the viewport without the Scale Manager".to_string(),
            );
        }

        warnings.extend(accessibility_warnings(snapshot));
        Ok(warnings)
    }
}

fn pixijs() -> EngineProfile {
    EngineProfile::new("pixijs", "PixiJS")
        .signature(Signature::script(["pixi.min.js", "pixi.js", "PIXI.Application"]))
        .signature(Signature::canvas_present())
        .recommend("Pack textures into spritesheets to benefit from batching")
        .recommend("Use ParticleContainer for large numbers of simple sprites")
        .recommend("Call destroy({ children: true, texture: true }) when removing scenes")
        .deep_analysis(PixiAnalysis)
}

struct PixiAnalysis;

impl DeepAnalysis for PixiAnalysis {
    fn analyze(
        &self,
        snapshot: &DocumentSnapshot,
        prober: &dyn CapabilityProber,
    ) -> Result<Vec<String>, AnalysisError> {
        let mut warnings = Vec::new();

        if let Some(caps) = probe_first(snapshot, prober)? {
            if !caps.webgl2 {
                warnings.push(
                    "WebGL 2 is unavailable; PixiJS v8 no longer supports WebGL 1".to_string(),
                );
            }
            texture_size_warning(&caps, MIN_COMFORTABLE_TEXTURE_SIZE, &mut warnings);
        }

        Ok(warnings)
    }
}

fn pico8() -> EngineProfile {
    EngineProfile::new("pico8", "PICO-8")
        .signature(Signature::script(["pico8_buttons", "_cartdat", "pico8_gpio"]))
        .signature(Signature::dom(["p8_playarea", "p8_container", "p8_frame"]))
        .signature(Signature::canvas_size(128, 128))
        .recommend("Upscale the 128x128 canvas with CSS and image-rendering: pixelated")
        .recommend("Enable the touch controls template for mobile players")
        .deep_analysis(Pico8Analysis)
}

struct Pico8Analysis;

impl DeepAnalysis for Pico8Analysis {
    fn analyze(
        &self,
        snapshot: &DocumentSnapshot,
        _prober: &dyn CapabilityProber,
    ) -> Result<Vec<String>, AnalysisError> {
        let mut warnings = Vec::new();

        let canvases = snapshot.canvases();
        let native = canvases.iter().any(|c| c.width == 128 && c.height == 128);
        if !canvases.is_empty() && !native {
            warnings.push(
                "No 128x128 canvas found; the cart runs at a non-native size".to_string(),
            );
        }
        if canvases.iter().any(|c| !c.style.pixelated) {
            warnings.push(
                "Canvas is not using image-rendering: pixelated; pixels will blur".to_string(),
            );
        }

        Ok(warnings)
    }
}

fn emscripten() -> EngineProfile {
    EngineProfile::new("emscripten", "Emscripten")
        .signature(Signature::script(["Module.canvas", "Module.setStatus", "emscripten"]))
        .signature(Signature::dom(["emscripten_border", "emscripten"]))
        .signature(Signature::html(["emscripten"]))
        .feature("sdl", Signature::script(["SDL", "USE_SDL"]))
        .recommend("Build release bundles with -O3 and -flto")
        .recommend("Link with -sALLOW_MEMORY_GROWTH instead of a large fixed heap")
        .recommend("Link with -sMAX_WEBGL_VERSION=2 to enable WebGL 2 where available")
        .deep_analysis(EmscriptenAnalysis)
}

struct EmscriptenAnalysis;

impl DeepAnalysis for EmscriptenAnalysis {
    fn analyze(
        &self,
        snapshot: &DocumentSnapshot,
        prober: &dyn CapabilityProber,
    ) -> Result<Vec<String>, AnalysisError> {
        let mut warnings = Vec::new();

        let handles_loss = snapshot.scripts_contain("webglcontextlost")
            || snapshot.html().contains("webglcontextlost");
        if !snapshot.canvases().is_empty() && !handles_loss {
            warnings.push(
                "No webglcontextlost handler; a GPU reset freezes the canvas".to_string(),
            );
        }

        if probe_first(snapshot, prober)?.is_some_and(|caps| !caps.webgl2) {
            warnings.push("Running on WebGL 1; link with -sMAX_WEBGL_VERSION=2".to_string());
        }

        Ok(warnings)
    }
}

fn vanilla_webgl() -> EngineProfile {
    EngineProfile::new("vanilla-webgl", "Hand-written WebGL")
        .signature(Signature::script([
            "getContext(\"webgl",
            "getContext('webgl",
            "getContext(`webgl",
        ]))
        .signature(Signature::webgl())
        .recommend("Batch draw calls and minimise state changes between them")
        .recommend("Handle webglcontextlost and webglcontextrestored events")
        .recommend("Request the context with powerPreference: 'high-performance'")
        .deep_analysis(GenericWebGlAnalysis)
}

struct GenericWebGlAnalysis;

impl DeepAnalysis for GenericWebGlAnalysis {
    fn analyze(
        &self,
        snapshot: &DocumentSnapshot,
        prober: &dyn CapabilityProber,
    ) -> Result<Vec<String>, AnalysisError> {
        let mut warnings = Vec::new();

        if let Some(caps) = probe_first(snapshot, prober)? {
            if !caps.webgl2 {
                warnings.push("Only WebGL 1 is available".to_string());
            }
            if !caps.float_textures {
                warnings.push("Float textures are unsupported".to_string());
            }
            anisotropy_warning(&caps, &mut warnings);
            texture_size_warning(&caps, MIN_COMFORTABLE_TEXTURE_SIZE, &mut warnings);
        }

        Ok(warnings)
    }
}

fn vanilla_canvas2d() -> EngineProfile {
    EngineProfile::new("vanilla-canvas2d", "Hand-written Canvas 2D")
        .signature(Signature::script(["getContext(\"2d\"", "getContext('2d'"]))
        .signature(Signature::canvas_present())
        .recommend("Drive rendering from requestAnimationFrame rather than timers")
        .recommend("Scale the backing store by devicePixelRatio on high-DPI screens")
        .recommend("Cache static layers in offscreen canvases")
        .deep_analysis(Canvas2dAnalysis)
}

struct Canvas2dAnalysis;

impl DeepAnalysis for Canvas2dAnalysis {
    fn analyze(
        &self,
        snapshot: &DocumentSnapshot,
        _prober: &dyn CapabilityProber,
    ) -> Result<Vec<String>, AnalysisError> {
        let mut warnings = Vec::new();
        if snapshot.canvases().is_empty() {
            return Ok(warnings);
        }

        if !snapshot.scripts_contain("devicePixelRatio") {
            warnings.push(
                "Canvas backing store is not scaled by devicePixelRatio; output will blur"
                    .to_string(),
            );
        }

        warnings.extend(accessibility_warnings(snapshot));
        Ok(warnings)
    }
}

/// Probes the first obtainable context. `None` when the snapshot has none.
fn probe_first(
    snapshot: &DocumentSnapshot,
    prober: &dyn CapabilityProber,
) -> Result<Option<CapabilityRecord>, AnalysisError> {
    match snapshot.first_context() {
        Some(ctx) => Ok(Some(prober.probe(ctx)?)),
        None => Ok(None),
    }
}

fn texture_size_warning(caps: &CapabilityRecord, minimum: u32, warnings: &mut Vec<String>) {
    if caps.max_texture_size > 0 && caps.max_texture_size < minimum {
        warnings.push(format!(
            "MAX_TEXTURE_SIZE is {}; larger textures fail to upload or are downscaled",
            caps.max_texture_size
        ));
    }
}

fn anisotropy_warning(caps: &CapabilityRecord, warnings: &mut Vec<String>) {
    if !caps.anisotropic_filtering {
        warnings.push(
            "EXT_texture_filter_anisotropic is unavailable; angled textures will blur".to_string(),
        );
    }
}

fn accessibility_warnings(snapshot: &DocumentSnapshot) -> Vec<String> {
    if snapshot.canvases().is_empty() {
        return Vec::new();
    }

    let labelled = !snapshot.select("[role=application]").is_empty()
        || !snapshot.select("canvas[aria-label]").is_empty()
        || !snapshot.select("canvas[role]").is_empty();

    if labelled {
        Vec::new()
    } else {
        vec!["Canvas has no accessible role or label; add role=\"application\"".to_string()]
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::capability::WebGlProber;
    use crate::capability::probe::EXT_TEXTURE_FILTER_ANISOTROPIC;
    use crate::profiles::catalog::ProfileRegistry;
    use crate::snapshot::context::{ContextParameters, ContextVersion, StaticContext};
    use crate::snapshot::model::{CanvasElement, CanvasStyle, Element, ScriptElement};
    use std::collections::BTreeMap;
    use std::sync::Arc;

    fn src(s: &str) -> ScriptElement {
        ScriptElement {
            text: None,
            src: Some(s.into()),
        }
    }

    fn canvas_with(ctx: StaticContext) -> CanvasElement {
        CanvasElement::new(960, 600).with_context(Arc::new(ctx))
    }

    fn mentions(warnings: &[String], needle: &str) -> bool {
        warnings.iter().any(|w| w.contains(needle))
    }

    #[test]
    fn every_profile_is_well_formed() {
        let registry = ProfileRegistry::builtin().unwrap();

        for p in registry.iter() {
            assert!(!p.signatures.is_empty(), "{} has no signatures", p.name);
            assert!(!p.recommendations.is_empty(), "{}", p.name);
        }
    }

    #[test]
    fn vanilla_profiles_are_registered_last() {
        let registry = ProfileRegistry::builtin().unwrap();
        let names = registry.names();
        let tail = &names[names.len() - 2..];

        assert_eq!(names[0], "unity");
        assert_eq!(tail, ["vanilla-webgl", "vanilla-canvas2d"]);
    }

    #[test]
    fn every_deep_analysis_tolerates_an_empty_snapshot() {
        let registry = ProfileRegistry::builtin().unwrap();
        let empty = DocumentSnapshot::default();

        for p in registry.iter() {
            let warnings = p.deep_analyze(&empty, &WebGlProber).unwrap();
            assert!(warnings.is_empty(), "{}: {warnings:?}", p.name);
        }
    }

    #[test]
    fn every_deep_analysis_tolerates_canvas_without_context() {
        let registry = ProfileRegistry::builtin().unwrap();
        let snap = DocumentSnapshot::new("", vec![], vec![], vec![CanvasElement::new(128, 128)]);

        for p in registry.iter() {
            assert!(p.deep_analyze(&snap, &WebGlProber).is_ok(), "{}", p.name);
        }
    }

    #[test]
    fn unity_warns_on_webgl1_and_legacy_loader() {
        let ctx = StaticContext::new(ContextVersion::WebGl).with_parameters(ContextParameters {
            max_texture_size: Some(2048),
            ..Default::default()
        });
        let snap = DocumentSnapshot::new(
            "",
            vec![src("Build/UnityLoader.js")],
            vec![],
            vec![canvas_with(ctx)],
        );

        let warnings = unity().deep_analyze(&snap, &WebGlProber).unwrap();

        assert!(mentions(&warnings, "Legacy UnityLoader"));
        assert!(mentions(&warnings, "WebGL 2 is unavailable"));
        assert!(mentions(&warnings, "MAX_TEXTURE_SIZE is 2048"));
        assert!(mentions(&warnings, "accessible role"));
    }

    #[test]
    fn accessible_canvas_is_not_flagged() {
        let mut attributes = BTreeMap::new();
        attributes.insert("role".to_string(), "application".to_string());
        let snap = DocumentSnapshot::new(
            "",
            vec![src("Build/game.loader.js")],
            vec![Element {
                tag: "div".into(),
                id: Some("unity-container".into()),
                classes: vec![],
                attributes,
            }],
            vec![canvas_with(StaticContext::new(ContextVersion::WebGl2))],
        );

        let warnings = unity().deep_analyze(&snap, &WebGlProber).unwrap();

        assert!(warnings.is_empty(), "{warnings:?}");
    }

    #[test]
    fn threejs_flags_missing_anisotropy_and_uncapped_pixel_ratio() {
        let snap = DocumentSnapshot::new(
            "",
            vec![ScriptElement {
                text: Some("renderer.setPixelRatio(window.devicePixelRatio);".into()),
                src: None,
            }],
            vec![],
            vec![canvas_with(StaticContext::new(ContextVersion::WebGl2))],
        );

        let warnings = threejs().deep_analyze(&snap, &WebGlProber).unwrap();

        assert_eq!(warnings.len(), 3);
        assert!(warnings[0].contains("raw devicePixelRatio"));
        assert!(warnings[1].contains("anisotropic"));
        assert!(warnings[2].contains("Float textures"));
    }

    #[test]
    fn playcanvas_is_quiet_with_full_capabilities() {
        let ctx = StaticContext::new(ContextVersion::WebGl2)
            .with_extensions([EXT_TEXTURE_FILTER_ANISOTROPIC]);
        let snap = DocumentSnapshot::new("", vec![], vec![], vec![canvas_with(ctx)]);

        let warnings = playcanvas().deep_analyze(&snap, &WebGlProber).unwrap();

        assert!(warnings.is_empty(), "{warnings:?}");
    }

    #[test]
    fn lost_context_surfaces_as_capability_error() {
        let snap = DocumentSnapshot::new(
            "",
            vec![],
            vec![],
            vec![canvas_with(StaticContext::new(ContextVersion::WebGl2).lost())],
        );

        let err = godot().deep_analyze(&snap, &WebGlProber).unwrap_err();

        assert!(matches!(err, AnalysisError::Probe(_)));
    }

    #[test]
    fn pico8_checks_native_size_and_pixelated_scaling() {
        let blurry = DocumentSnapshot::new("", vec![], vec![], vec![CanvasElement::new(128, 128)]);
        let style = CanvasStyle {
            pixelated: true,
            ..Default::default()
        };
        let crisp = DocumentSnapshot::new(
            "",
            vec![],
            vec![],
            vec![CanvasElement::new(128, 128).with_style(style)],
        );

        let warnings = pico8().deep_analyze(&blurry, &WebGlProber).unwrap();
        assert_eq!(warnings.len(), 1);
        assert!(warnings[0].contains("pixelated"));

        let warnings = pico8().deep_analyze(&crisp, &WebGlProber).unwrap();
        assert!(warnings.is_empty(), "{warnings:?}");
    }

    #[test]
    fn phaser_flags_stretched_canvas_without_scale_manager() {
        let style = CanvasStyle {
            fills_viewport: true,
            ..Default::default()
        };
        let snap = DocumentSnapshot::new(
            "",
            vec![src("phaser.min.js")],
            vec![],
            vec![CanvasElement::new(800, 600).with_style(style)],
        );

        let warnings = phaser().deep_analyze(&snap, &WebGlProber).unwrap();

        assert!(mentions(&warnings, "Scale Manager"));
    }

    #[test]
    fn emscripten_requires_context_loss_handler() {
        let without = DocumentSnapshot::new("", vec![], vec![], vec![CanvasElement::new(1, 1)]);
        let with = DocumentSnapshot::new(
            "<script>canvas.addEventListener('webglcontextlost', onLost)</script>",
            vec![],
            vec![],
            vec![CanvasElement::new(1, 1)],
        );

        let bare = emscripten().deep_analyze(&without, &WebGlProber).unwrap();
        let handled = emscripten().deep_analyze(&with, &WebGlProber).unwrap();

        assert_eq!(bare.len(), 1);
        assert!(handled.is_empty(), "{handled:?}");
    }

    #[test]
    fn emscripten_suggests_webgl2_on_webgl1() {
        let html = "<script>addEventListener('webglcontextlost', f)</script>";
        let ctx = StaticContext::new(ContextVersion::WebGl);
        let snap = DocumentSnapshot::new(html, vec![], vec![], vec![canvas_with(ctx)]);

        let warnings = emscripten().deep_analyze(&snap, &WebGlProber).unwrap();

        assert_eq!(warnings.len(), 1);
        assert!(mentions(&warnings, "MAX_WEBGL_VERSION=2"));
    }

    #[test]
    fn defold_flags_webgl1_without_instancing() {
        let webgl1 = StaticContext::new(ContextVersion::WebGl);
        let instanced =
            StaticContext::new(ContextVersion::WebGl).with_extensions(["ANGLE_instanced_arrays"]);
        let plain = DocumentSnapshot::new("", vec![], vec![], vec![canvas_with(webgl1)]);
        let capable = DocumentSnapshot::new("", vec![], vec![], vec![canvas_with(instanced)]);

        let warnings = defold().deep_analyze(&plain, &WebGlProber).unwrap();
        assert!(mentions(&warnings, "ANGLE_instanced_arrays"));

        let warnings = defold().deep_analyze(&capable, &WebGlProber).unwrap();
        assert!(warnings.is_empty(), "{warnings:?}");
    }

    #[test]
    fn deep_analysis_is_idempotent() {
        let snap = DocumentSnapshot::new(
            "",
            vec![src("Build/UnityLoader.js")],
            vec![],
            vec![canvas_with(StaticContext::new(ContextVersion::WebGl))],
        );
        let profile = unity();

        assert_eq!(
            profile.deep_analyze(&snap, &WebGlProber).unwrap(),
            profile.deep_analyze(&snap, &WebGlProber).unwrap()
        );
    }
}
