use super::{AnnotationLine, AnnotationRecord, ImagePreprocessor};
use crate::{common::*, config::MatchingConfig, error::Result};

/// Parsed records together with their preprocessed images.
#[derive(Debug, Clone)]
pub struct Batch {
    pub records: Vec<AnnotationRecord>,
    /// `batch × channels × height × width`, in record order.
    pub images: Array4<f32>,
}

/// Reads annotation lines into records and loads their images.
#[derive(Debug)]
pub struct AnnotationReader<P>
where
    P: ImagePreprocessor,
{
    config: Arc<MatchingConfig>,
    preprocessor: Arc<P>,
}

impl<P> Clone for AnnotationReader<P>
where
    P: ImagePreprocessor,
{
    fn clone(&self) -> Self {
        Self {
            config: self.config.clone(),
            preprocessor: self.preprocessor.clone(),
        }
    }
}

impl<P> AnnotationReader<P>
where
    P: 'static + ImagePreprocessor,
{
    pub fn new(config: Arc<MatchingConfig>, preprocessor: P) -> Result<Self> {
        config.validate()?;
        Ok(Self {
            config,
            preprocessor: Arc::new(preprocessor),
        })
    }

    pub fn config(&self) -> &MatchingConfig {
        &self.config
    }

    /// Parse every line, failing on the first malformed one.
    pub fn parse(&self, lines: &[AnnotationLine]) -> Result<Vec<AnnotationRecord>> {
        lines.iter().map(|line| line.parse(&self.config)).collect()
    }

    /// Parse the lines and load the referenced images. The i-th record and
    /// image come from the i-th line.
    pub async fn read(&self, lines: &[AnnotationLine]) -> Result<Batch> {
        let records = self.parse(lines)?;

        let image_paths: Vec<PathBuf> = records
            .iter()
            .map(|record| record.image_path.clone())
            .collect();
        let preprocessor = self.preprocessor.clone();
        let tensors: Vec<Array3<f32>> = stream::iter(image_paths)
            .par_map(None, move |path| {
                let preprocessor = preprocessor.clone();
                move || preprocessor.preprocess(&path)
            })
            .try_collect()
            .await?;

        let images = if tensors.is_empty() {
            let (c, h, w) = self.preprocessor.output_shape();
            Array4::zeros((0, c, h, w))
        } else {
            let views: Vec<_> = tensors.iter().map(|tensor| tensor.view()).collect();
            ndarray::stack(Axis(0), &views)?
        };

        Ok(Batch { records, images })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::Error;

    /// Fills each image with the length of its path.
    #[derive(Debug)]
    struct PathLengthImage;

    impl ImagePreprocessor for PathLengthImage {
        fn preprocess(&self, path: &Path) -> Result<Array3<f32>> {
            let len = path.as_os_str().len() as f32;
            Ok(Array3::from_elem(self.output_shape(), len))
        }

        fn output_shape(&self) -> (usize, usize, usize) {
            (3, 2, 2)
        }
    }

    fn reader() -> AnnotationReader<PathLengthImage> {
        AnnotationReader::new(Arc::new(MatchingConfig::default()), PathLengthImage).unwrap()
    }

    #[tokio::test]
    async fn read_preserves_order() {
        let text = "a.png 100 100 10 10 50 50 2\n\
                    bbb.png 100 100\n\
                    cc.png 200 100 0 0 10 10 1 20 20 40 40 3\n";
        let lines = AnnotationLine::enumerate(text);
        let batch = reader().read(&lines).await.unwrap();

        let paths: Vec<_> = batch
            .records
            .iter()
            .map(|record| record.image_path.to_str().unwrap().to_owned())
            .collect();
        assert_eq!(paths, vec!["a.png", "bbb.png", "cc.png"]);
        assert_eq!(batch.images.dim(), (3, 3, 2, 2));
        for (index, expect) in [5.0, 7.0, 6.0].into_iter().enumerate() {
            assert!(batch
                .images
                .index_axis(Axis(0), index)
                .iter()
                .all(|&value| value == expect));
        }
        let objects: Vec<_> = batch.records.iter().map(|r| r.num_objects()).collect();
        assert_eq!(objects, vec![1, 0, 2]);
    }

    #[tokio::test]
    async fn read_empty() {
        let batch = reader().read(&[]).await.unwrap();
        assert!(batch.records.is_empty());
        assert_eq!(batch.images.dim(), (0, 3, 2, 2));
    }

    #[tokio::test]
    async fn malformed_line_aborts_batch() {
        let text = "a.png 100 100 10 10 50 50 2\n\nb.png 100 100 10 10 50\n";
        let lines = AnnotationLine::enumerate(text);
        match reader().read(&lines).await {
            Err(Error::MalformedAnnotation {
                line_index,
                content,
                ..
            }) => {
                assert_eq!(line_index, 2);
                assert_eq!(content, "b.png 100 100 10 10 50");
            }
            other => panic!("unexpected result {:?}", other.map(|batch| batch.records)),
        }
    }
}
