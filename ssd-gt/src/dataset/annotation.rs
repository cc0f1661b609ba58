use crate::{
    boxes::{resize_box, PixelBox},
    common::*,
    config::MatchingConfig,
    error::{Error, Result},
};

/// Number of tokens describing one box: `xmin ymin xmax ymax class_id`.
pub const TOKENS_PER_BOX: usize = 5;

/// One line of an annotation file together with its position in the file.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct AnnotationLine {
    pub index: usize,
    pub content: String,
}

impl AnnotationLine {
    /// Split annotation text into lines, skipping blank ones. Line indexes are
    /// zero-based positions in the original text.
    pub fn enumerate(text: &str) -> Vec<Self> {
        text.lines()
            .enumerate()
            .filter(|(_, line)| !line.trim().is_empty())
            .map(|(index, line)| Self {
                index,
                content: line.to_owned(),
            })
            .collect()
    }

    pub fn parse(&self, config: &MatchingConfig) -> Result<AnnotationRecord> {
        parse_annotation_line(self.index, &self.content, config)
    }
}

/// The boxes of one image, resized into the network input space.
#[derive(Debug, Clone, PartialEq)]
pub struct AnnotationRecord {
    pub image_path: PathBuf,
    pub image_height: usize,
    pub image_width: usize,
    /// Exactly `max_boxes_per_image` slots, objects first, then padding.
    pub boxes: Vec<PixelBox>,
}

impl AnnotationRecord {
    pub fn num_objects(&self) -> usize {
        self.boxes.iter().filter(|slot| !slot.is_padding()).count()
    }

    /// The `max_boxes_per_image × 5` row encoding of the slots.
    pub fn to_rows(&self) -> Vec<[f32; 5]> {
        self.boxes.iter().map(|slot| slot.to_row()).collect()
    }
}

/// Parse `path height width (xmin ymin xmax ymax class_id)*`.
///
/// Boxes beyond `max_boxes_per_image` are dropped without error.
pub fn parse_annotation_line(
    line_index: usize,
    line: &str,
    config: &MatchingConfig,
) -> Result<AnnotationRecord> {
    let malformed = |reason: String| Error::MalformedAnnotation {
        line_index,
        content: line.to_owned(),
        reason,
    };
    let parse_int = |token: &str, name: &str| -> Result<i64> {
        token
            .parse::<i64>()
            .map_err(|_| malformed(format!("{} '{}' is not an integer", name, token)))
    };

    let tokens: Vec<&str> = line.split_whitespace().collect();
    let (image_file, image_height, image_width, box_tokens) = match tokens.as_slice() {
        [image_file, image_height, image_width, box_tokens @ ..] => {
            (*image_file, *image_height, *image_width, box_tokens)
        }
        _ => {
            return Err(malformed(
                "expect at least the image path, height and width".into(),
            ))
        }
    };

    let image_height = parse_int(image_height, "image height")?;
    let image_width = parse_int(image_width, "image width")?;
    if image_height <= 0 || image_width <= 0 {
        return Err(malformed(format!(
            "image size {}x{} must be positive",
            image_width, image_height
        )));
    }
    let (image_height, image_width) = (image_height as usize, image_width as usize);

    if box_tokens.len() % TOKENS_PER_BOX != 0 {
        return Err(malformed(format!(
            "the number of box tokens {} is not a multiple of {}",
            box_tokens.len(),
            TOKENS_PER_BOX
        )));
    }

    let max_boxes = config.max_boxes_per_image.get();
    let num_boxes = box_tokens.len() / TOKENS_PER_BOX;
    if num_boxes > max_boxes {
        debug!(
            "line {} has {} boxes, keeping the first {}",
            line_index, num_boxes, max_boxes
        );
    }

    let target_size = config.target_size();
    let mut boxes: Vec<PixelBox> = box_tokens
        .chunks(TOKENS_PER_BOX)
        .take(max_boxes)
        .map(|chunk| -> Result<_> {
            let [xmin, ymin, xmax, ymax, class_id] = [
                parse_int(chunk[0], "xmin")?,
                parse_int(chunk[1], "ymin")?,
                parse_int(chunk[2], "xmax")?,
                parse_int(chunk[3], "ymax")?,
                parse_int(chunk[4], "class_id")?,
            ];
            // negative ids mark unused slots
            if class_id < 0 {
                return Ok(Slot::Padding);
            }

            // inverted boxes collapse to zero area and never match
            let rect = Corners::try_from_corners([
                xmin as f32,
                ymin as f32,
                xmax.max(xmin) as f32,
                ymax.max(ymin) as f32,
            ])
            .map_err(|err| {
                malformed(format!(
                    "invalid box ({}, {}, {}, {}): {}",
                    xmin, ymin, xmax, ymax, err
                ))
            })?;
            let rect = resize_box(image_height, image_width, &rect, &target_size)?;

            Ok(Slot::Object(Label {
                rect,
                class: class_id as usize,
            }))
        })
        .collect::<Result<_>>()?;
    boxes.resize(max_boxes, Slot::Padding);

    Ok(AnnotationRecord {
        image_path: PathBuf::from(image_file),
        image_height,
        image_width,
        boxes,
    })
}
