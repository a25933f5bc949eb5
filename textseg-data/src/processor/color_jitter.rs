//! The random color jitter algorithm.

use crate::{
    common::*,
    tensor::{hsv_to_rgb, rgb_to_hsv},
};

/// The color jitter strength from configuration.
///
/// A scalar sets brightness, contrast and saturation to the same strength
/// with hue disabled. A list sets brightness, contrast, saturation and
/// optionally hue.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ColorJitterConfig {
    Scalar(R64),
    List(Vec<R64>),
}

impl ColorJitterConfig {
    pub fn to_init(&self) -> Result<ColorJitterInit> {
        let init = match self {
            Self::Scalar(value) => ColorJitterInit {
                brightness: *value,
                contrast: *value,
                saturation: *value,
                hue: None,
            },
            Self::List(values) => match values.as_slice() {
                &[brightness, contrast, saturation] => ColorJitterInit {
                    brightness,
                    contrast,
                    saturation,
                    hue: None,
                },
                &[brightness, contrast, saturation, hue] => ColorJitterInit {
                    brightness,
                    contrast,
                    saturation,
                    hue: Some(hue),
                },
                _ => bail!(
                    "color jitter must have 3 or 4 values, but get {}",
                    values.len()
                ),
            },
        };
        Ok(init)
    }
}

/// Builds the color jitter parameters. It returns `None` if jitter is disabled.
pub fn color_jitter_init(config: Option<&ColorJitterConfig>) -> Result<Option<ColorJitterInit>> {
    config.map(ColorJitterConfig::to_init).transpose()
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ColorJitterInit {
    pub brightness: R64,
    pub contrast: R64,
    pub saturation: R64,
    pub hue: Option<R64>,
}

impl ColorJitterInit {
    /// The jitter strengths in order of brightness, contrast, saturation and hue.
    pub fn strengths(&self) -> Vec<R64> {
        let Self {
            brightness,
            contrast,
            saturation,
            hue,
        } = *self;
        [brightness, contrast, saturation]
            .into_iter()
            .chain(hue)
            .collect()
    }

    pub fn build(self) -> Result<ColorJitter> {
        let Self {
            brightness,
            contrast,
            saturation,
            hue,
        } = self;

        let factor_range = |name: &str, strength: R64| -> Result<_> {
            ensure!(
                strength >= 0.0,
                "{} strength must be non-negative, but get {}",
                name,
                strength
            );
            let strength = strength.raw();
            Ok((strength > 0.0).then(|| ((1.0 - strength).max(0.0), 1.0 + strength)))
        };

        let max_hue_shift = match hue {
            Some(hue) => {
                ensure!(
                    (0.0..=0.5).contains(&hue.raw()),
                    "hue strength must be in range [0, 0.5], but get {}",
                    hue
                );
                (hue > 0.0).then(|| hue.raw())
            }
            None => None,
        };

        Ok(ColorJitter {
            brightness: factor_range("brightness", brightness)?,
            contrast: factor_range("contrast", contrast)?,
            saturation: factor_range("saturation", saturation)?,
            max_hue_shift,
        })
    }
}

#[derive(Debug, Clone)]
pub struct ColorJitter {
    brightness: Option<(f64, f64)>,
    contrast: Option<(f64, f64)>,
    saturation: Option<(f64, f64)>,
    max_hue_shift: Option<f64>,
}

impl ColorJitter {
    /// Perturbs a 3×H×W float RGB tensor with values in [0, 1].
    ///
    /// The enabled adjustments are applied in a random order.
    pub fn forward(&self, rgb: &Tensor) -> Result<Tensor> {
        tch::no_grad(|| -> Result<_> {
            let (channels, _height, _width) = rgb.size3()?;
            ensure!(
                channels == 3,
                "channel size must be 3, but get {}",
                channels
            );

            let mut rng = StdRng::from_entropy();
            let mut image = rgb.to_kind(Kind::Float);

            let mut adjustments = [
                Adjustment::Brightness,
                Adjustment::Contrast,
                Adjustment::Saturation,
                Adjustment::Hue,
            ];
            adjustments.shuffle(&mut rng);

            for adjustment in adjustments {
                image = match adjustment {
                    Adjustment::Brightness => match self.brightness {
                        Some((min, max)) => {
                            let factor = rng.gen_range(min..=max);
                            (&image * factor).clamp(0.0, 1.0)
                        }
                        None => image,
                    },
                    Adjustment::Contrast => match self.contrast {
                        Some((min, max)) => {
                            let factor = rng.gen_range(min..=max);
                            let mean = grayscale(&image).mean(Kind::Float);
                            blend(&image, &mean, factor)
                        }
                        None => image,
                    },
                    Adjustment::Saturation => match self.saturation {
                        Some((min, max)) => {
                            let factor = rng.gen_range(min..=max);
                            let gray = grayscale(&image).unsqueeze(0);
                            blend(&image, &gray, factor)
                        }
                        None => image,
                    },
                    Adjustment::Hue => match self.max_hue_shift {
                        Some(max_shift) => {
                            let shift = rng.gen_range((-max_shift)..=max_shift);
                            shift_hue(&image, shift)?
                        }
                        None => image,
                    },
                };
            }

            Ok(image)
        })
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Adjustment {
    Brightness,
    Contrast,
    Saturation,
    Hue,
}

fn grayscale(rgb: &Tensor) -> Tensor {
    rgb.select(0, 0) * 0.299 + rgb.select(0, 1) * 0.587 + rgb.select(0, 2) * 0.114
}

fn blend(image: &Tensor, other: &Tensor, factor: f64) -> Tensor {
    (image * factor + other * (1.0 - factor)).clamp(0.0, 1.0)
}

/// Shifts the hue channel by `shift` turns, wrapping around modulo 1.
fn shift_hue(rgb: &Tensor, shift: f64) -> Result<Tensor> {
    let hsv = rgb_to_hsv(rgb)?;
    let hue = (hsv.select(0, 0) + shift + 1.0).fmod(1.0);
    let hsv = Tensor::stack(&[hue, hsv.select(0, 1), hsv.select(0, 2)], 0);
    Ok(hsv_to_rgb(&hsv)?.clamp(0.0, 1.0))
}
