//! Conversions between arrays and tensors.

use crate::common::*;

pub trait ArrayIntoTensor {
    fn f_into_tensor(&self) -> Result<Tensor>;
}

impl ArrayIntoTensor for Array3<u8> {
    /// Converts H×W×C bytes to a C×H×W tensor of kind `Uint8`.
    fn f_into_tensor(&self) -> Result<Tensor> {
        let (height, width, channels) = self.dim();
        let data = self.as_standard_layout();
        let slice = data
            .as_slice()
            .ok_or_else(|| format_err!("the array is not contiguous"))?;
        let tensor = Tensor::of_slice(slice)
            .f_view([height as i64, width as i64, channels as i64])?
            .f_permute(&[2i64, 0, 1])?
            .f_contiguous()?;
        Ok(tensor)
    }
}

impl ArrayIntoTensor for Array2<i64> {
    /// Converts the H×W class index array to a tensor of kind `Int64`.
    fn f_into_tensor(&self) -> Result<Tensor> {
        let (height, width) = self.dim();
        let data = self.as_standard_layout();
        let slice = data
            .as_slice()
            .ok_or_else(|| format_err!("the array is not contiguous"))?;
        let tensor = Tensor::of_slice(slice).f_view([height as i64, width as i64])?;
        Ok(tensor)
    }
}

/// Scales a C×H×W byte tensor to floats in [0, 1].
pub fn to_unit_float(image: &Tensor) -> Result<Tensor> {
    let (channels, _height, _width) = image.size3()?;
    ensure!(
        channels == 3,
        "channel size must be 3, but get {}",
        channels
    );
    Ok(image.f_to_kind(Kind::Float)? / 255.0)
}

/// Converts a C×H×W float tensor in [0, 1] back to H×W×C bytes.
pub fn unit_float_to_array(image: &Tensor) -> Result<Array3<u8>> {
    let (channels, height, width) = image.size3()?;
    let bytes = tch::no_grad(|| {
        (image.clamp(0.0, 1.0) * 255.0)
            .round()
            .to_kind(Kind::Uint8)
            .permute(&[1i64, 2, 0])
            .contiguous()
            .view([-1i64])
    });
    let data = Vec::<u8>::from(bytes);
    let array = Array3::from_shape_vec(
        (height as usize, width as usize, channels as usize),
        data,
    )?;
    Ok(array)
}

/// Converts a 3×H×W RGB tensor in [0, 1] to HSV. Hue is scaled to [0, 1).
pub fn rgb_to_hsv(rgb: &Tensor) -> Result<Tensor> {
    let eps = 1e-4;
    let (channels, _height, _width) = rgb.size3()?;
    ensure!(
        channels == 3,
        "channel size must be 3, but get {}",
        channels
    );

    let red = rgb.select(0, 0);
    let green = rgb.select(0, 1);
    let blue = rgb.select(0, 2);

    let (max, argmax) = rgb.max2(0, false);
    let (min, _argmin) = rgb.min2(0, false);
    let diff = &max - &min;

    let value = max;
    let saturation = (&diff / &value.clamp_min(eps)).where1(&value.gt(eps), &value.zeros_like());

    let hue = {
        let divisor = diff.clamp_min(eps);
        let case1 = value.zeros_like();
        let case2 = (&green - &blue) / &divisor;
        let case3 = (&blue - &red) / &divisor + 2.0;
        let case4 = (&red - &green) / &divisor + 4.0;

        let hue = case1.where1(
            &diff.le(eps),
            &case2.where1(&argmax.eq(0), &case3.where1(&argmax.eq(1), &case4)),
        );
        let hue = hue.where1(&hue.ge(0.0), &(&hue + 6.0));
        hue / 6.0
    };

    Ok(Tensor::stack(&[hue, saturation, value], 0))
}

/// Converts a 3×H×W HSV tensor back to RGB.
pub fn hsv_to_rgb(hsv: &Tensor) -> Result<Tensor> {
    let (channels, _height, _width) = hsv.size3()?;
    ensure!(
        channels == 3,
        "channel size must be 3, but get {}",
        channels
    );

    let hue = hsv.select(0, 0);
    let saturation = hsv.select(0, 1);
    let value = hsv.select(0, 2);

    let component = |n: f64| {
        let k = (&hue * 6.0 + n).fmod(6.0);
        let weight = k.minimum(&(-&k + 4.0)).clamp(0.0, 1.0);
        &value - &value * &saturation * weight
    };

    let red = component(5.0);
    let green = component(3.0);
    let blue = component(1.0);
    Ok(Tensor::stack(&[red, green, blue], 0))
}

/// The height and width of a C×H×W tensor.
pub fn tensor_hw(image: &Tensor) -> Result<(usize, usize)> {
    let (_channels, height, width) = image.size3()?;
    Ok((height as usize, width as usize))
}
