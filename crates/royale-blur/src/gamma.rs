use crate::error::BlurError;

/// NTSC broadcast gamma.
pub const NTSC_GAMMA: f32 = 2.2;
/// PAL broadcast gamma.
pub const PAL_GAMMA: f32 = 2.8;
/// Upper bound of typical CRT reference gamma.
pub const CRT_REFERENCE_GAMMA_HIGH: f32 = 2.5;
/// Lower bound of typical CRT reference gamma.
pub const CRT_REFERENCE_GAMMA_LOW: f32 = 2.35;
/// Reference gamma of a calibrated LCD.
pub const LCD_REFERENCE_GAMMA: f32 = 2.5;
/// Gamma of a CRT in an office viewing environment.
pub const CRT_OFFICE_GAMMA: f32 = 2.2;
/// Gamma of an LCD in an office viewing environment.
pub const LCD_OFFICE_GAMMA: f32 = 2.2;
/// Effective gamma of the original Game Boy Advance screen.
pub const GBA_GAMMA: f32 = 3.5;

/// Gamma of the CRT side of a display simulation.
pub const CRT_GAMMA: f32 = CRT_REFERENCE_GAMMA_HIGH;
/// Gamma of the LCD side of a display simulation.
pub const LCD_GAMMA: f32 = LCD_OFFICE_GAMMA;
/// Gamma used to store intermediate passes when every stage is encoded.
pub const INTERMEDIATE_GAMMA: f32 = NTSC_GAMMA;

/// Which display the content was mastered for and which one shows it.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum DisplaySimulation {
    /// Content and display share the NTSC gamma.
    #[default]
    None,
    /// CRT-mastered content on an LCD.
    CrtOnLcd,
    /// Game Boy Advance content on an LCD.
    GbaOnLcd,
    /// LCD-mastered content on a CRT.
    LcdOnCrt,
    /// Game Boy Advance content on a CRT.
    GbaOnCrt,
}

impl DisplaySimulation {
    /// The `(input, output)` gamma pair for this simulation.
    pub fn gammas(&self) -> (f32, f32) {
        match self {
            DisplaySimulation::None => (NTSC_GAMMA, NTSC_GAMMA),
            DisplaySimulation::CrtOnLcd => (CRT_GAMMA, LCD_GAMMA),
            DisplaySimulation::GbaOnLcd => (GBA_GAMMA, LCD_GAMMA),
            DisplaySimulation::LcdOnCrt => (LCD_GAMMA, CRT_GAMMA),
            DisplaySimulation::GbaOnCrt => (GBA_GAMMA, CRT_GAMMA),
        }
    }
}

/// Where the current pass sits in the pipeline. Supplied by the caller.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct GammaStage {
    /// The pass reads the original gamma-encoded input.
    pub first_pass: bool,
    /// The pass writes the final displayed output.
    pub last_pass: bool,
    /// Every intermediate pass is stored gamma-encoded.
    pub encode_every_stage: bool,
}

impl GammaStage {
    /// A single pass that both reads the input and writes the output.
    pub fn only_pass() -> Self {
        Self {
            first_pass: true,
            last_pass: true,
            encode_every_stage: false,
        }
    }

    /// Whether fetched samples must be linearized.
    pub fn linearize_input(&self) -> bool {
        self.encode_every_stage || self.first_pass
    }

    /// Whether the output must be gamma-encoded.
    pub fn gamma_encode_output(&self) -> bool {
        self.encode_every_stage || self.last_pass
    }
}

/// Gamma exponents for the pipeline ends and intermediate storage.
#[derive(Clone, Copy, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct GammaSettings {
    input_gamma: f32,
    output_gamma: f32,
    intermediate_gamma: f32,
    assume_opaque_alpha: bool,
}

impl Default for GammaSettings {
    fn default() -> Self {
        Self::from_simulation(DisplaySimulation::default())
    }
}

impl GammaSettings {
    /// Create gamma settings.
    ///
    /// # Arguments
    ///
    /// * `input_gamma` - Gamma of the pipeline input.
    /// * `output_gamma` - Gamma of the display.
    /// * `intermediate_gamma` - Gamma of encoded intermediate passes.
    /// * `assume_opaque_alpha` - Force alpha to 1 when linearizing or encoding.
    ///
    /// # Errors
    ///
    /// Returns [`BlurError::InvalidGamma`] if any gamma is not finite and positive.
    pub fn new(
        input_gamma: f32,
        output_gamma: f32,
        intermediate_gamma: f32,
        assume_opaque_alpha: bool,
    ) -> Result<Self, BlurError> {
        for gamma in [input_gamma, output_gamma, intermediate_gamma] {
            if !(gamma.is_finite() && gamma > 0.0) {
                return Err(BlurError::InvalidGamma(gamma));
            }
        }
        Ok(Self {
            input_gamma,
            output_gamma,
            intermediate_gamma,
            assume_opaque_alpha,
        })
    }

    /// Settings for a display simulation with NTSC intermediate gamma.
    pub fn from_simulation(simulation: DisplaySimulation) -> Self {
        let (input_gamma, output_gamma) = simulation.gammas();
        Self {
            input_gamma,
            output_gamma,
            intermediate_gamma: INTERMEDIATE_GAMMA,
            assume_opaque_alpha: false,
        }
    }

    /// Set whether alpha is forced to 1 when linearizing.
    pub fn with_opaque_alpha(mut self, assume_opaque_alpha: bool) -> Self {
        self.assume_opaque_alpha = assume_opaque_alpha;
        self
    }

    /// Gamma of the pipeline input.
    pub fn input_gamma(&self) -> f32 {
        self.input_gamma
    }

    /// Gamma of the display.
    pub fn output_gamma(&self) -> f32 {
        self.output_gamma
    }

    /// Gamma of encoded intermediate passes.
    pub fn intermediate_gamma(&self) -> f32 {
        self.intermediate_gamma
    }

    /// Whether alpha is forced to 1 when linearizing.
    pub fn assume_opaque_alpha(&self) -> bool {
        self.assume_opaque_alpha
    }
}

/// Per-pass gamma decode and encode, a pure function of stage flags and settings.
///
/// # Examples
///
/// ```
/// use royale_blur::gamma::{GammaGateway, GammaSettings, GammaStage};
///
/// let gateway = GammaGateway::new(GammaStage::only_pass(), GammaSettings::default());
/// let linear = gateway.decode_input([0.5f32, 0.5, 0.5]);
/// let encoded = gateway.encode_output(linear);
///
/// assert!((encoded[0] - 0.5).abs() < 1e-6);
/// ```
#[derive(Clone, Copy, Debug, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct GammaGateway {
    stage: GammaStage,
    settings: GammaSettings,
}

impl GammaGateway {
    /// Create a gateway for one pass.
    pub fn new(stage: GammaStage, settings: GammaSettings) -> Self {
        Self { stage, settings }
    }

    /// A gateway that neither decodes nor encodes.
    pub fn passthrough() -> Self {
        Self::default()
    }

    /// The stage flags.
    pub fn stage(&self) -> GammaStage {
        self.stage
    }

    /// The gamma settings.
    pub fn settings(&self) -> GammaSettings {
        self.settings
    }

    /// Gamma applied to fetched samples: the input gamma on the first pass, the
    /// intermediate gamma on later passes when every stage is encoded, else 1.
    pub fn pass_input_gamma(&self) -> f32 {
        if self.stage.first_pass {
            self.settings.input_gamma
        } else if self.stage.encode_every_stage {
            self.settings.intermediate_gamma
        } else {
            1.0
        }
    }

    /// Gamma applied to the output: the display gamma on the last pass, the
    /// intermediate gamma on earlier passes when every stage is encoded, else 1.
    pub fn pass_output_gamma(&self) -> f32 {
        if self.stage.last_pass {
            self.settings.output_gamma
        } else if self.stage.encode_every_stage {
            self.settings.intermediate_gamma
        } else {
            1.0
        }
    }

    /// Linearize a fetched color if this pass reads gamma-encoded data.
    pub fn decode_input<const C: usize>(&self, mut color: [f32; C]) -> [f32; C] {
        if !self.stage.linearize_input() {
            return color;
        }
        let gamma = self.pass_input_gamma();
        let n = color_channels(C);
        for v in color.iter_mut().take(n) {
            *v = v.powf(gamma);
        }
        if self.settings.assume_opaque_alpha && n < C {
            color[C - 1] = 1.0;
        }
        color
    }

    /// Gamma-encode an output color if this pass writes encoded data.
    pub fn encode_output<const C: usize>(&self, mut color: [f32; C]) -> [f32; C] {
        if !self.stage.gamma_encode_output() {
            return color;
        }
        let gamma_inv = self.pass_output_gamma().recip();
        let n = color_channels(C);
        for v in color.iter_mut().take(n) {
            *v = v.powf(gamma_inv);
        }
        if self.settings.assume_opaque_alpha && n < C {
            color[C - 1] = 1.0;
        }
        color
    }
}

// Two and four channel colors carry alpha in the last channel.
const fn color_channels(channels: usize) -> usize {
    match channels {
        2 => 1,
        4 => 3,
        c => c,
    }
}
