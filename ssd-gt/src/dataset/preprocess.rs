use crate::{
    common::*,
    config::MatchingConfig,
    error::{Error, Result},
};
use image::imageops::FilterType;

/// Turns an image file into a fixed-shape `channels × height × width` tensor.
pub trait ImagePreprocessor
where
    Self: Debug + Send + Sync,
{
    fn preprocess(&self, path: &Path) -> Result<Array3<f32>>;

    /// The `(channels, height, width)` shape of every produced tensor.
    fn output_shape(&self) -> (usize, usize, usize);
}

/// Decodes an image, stretches it onto the network input size and scales
/// pixel values into `[0, 1]`.
#[derive(Debug, Clone)]
pub struct ResizePreprocessor {
    width: u32,
    height: u32,
}

impl ResizePreprocessor {
    pub fn new(config: &MatchingConfig) -> Self {
        Self {
            width: config.image_width.get() as u32,
            height: config.image_height.get() as u32,
        }
    }
}

impl ImagePreprocessor for ResizePreprocessor {
    fn preprocess(&self, path: &Path) -> Result<Array3<f32>> {
        let Self { width, height } = *self;

        let image = image::open(path).map_err(|source| Error::Image {
            path: path.to_owned(),
            source,
        })?;
        let image = image
            .resize_exact(width, height, FilterType::Triangle)
            .to_rgb8();

        let tensor = Array3::from_shape_fn(
            (3, height as usize, width as usize),
            |(channel, y, x)| image.get_pixel(x as u32, y as u32)[channel] as f32 / 255.0,
        );
        Ok(tensor)
    }

    fn output_shape(&self) -> (usize, usize, usize) {
        (3, self.height as usize, self.width as usize)
    }
}
