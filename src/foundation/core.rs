/// Opaque 8-bit RGB color.
///
/// Serialized as a `[r, g, b]` array.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
#[serde(from = "[u8; 3]", into = "[u8; 3]")]
pub struct Rgb8 {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Rgb8 {
    pub const BLACK: Self = Self::new(0, 0, 0);
    pub const WHITE: Self = Self::new(255, 255, 255);

    pub const fn new(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }

    pub(crate) fn premul_opaque(self) -> Rgba8Premul {
        Rgba8Premul([self.r, self.g, self.b, 255])
    }
}

impl From<[u8; 3]> for Rgb8 {
    fn from([r, g, b]: [u8; 3]) -> Self {
        Self::new(r, g, b)
    }
}

impl From<Rgb8> for [u8; 3] {
    fn from(c: Rgb8) -> Self {
        [c.r, c.g, c.b]
    }
}

/// Premultiplied RGBA8 pixel.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) struct Rgba8Premul(pub [u8; 4]);

impl Rgba8Premul {
    pub(crate) fn from_straight(px: [u8; 4]) -> Self {
        let a = u16::from(px[3]);
        if a == 0 {
            return Self([0, 0, 0, 0]);
        }
        let premul = |c: u8| (((u16::from(c) * a) + 127) / 255) as u8;
        Self([premul(px[0]), premul(px[1]), premul(px[2]), px[3]])
    }

    pub(crate) fn to_straight(self) -> [u8; 4] {
        let [r, g, b, a] = self.0;
        if a == 0 {
            return [0, 0, 0, 0];
        }
        if a == 255 {
            return [r, g, b, 255];
        }
        let a32 = u32::from(a);
        let unpremul = |c: u8| ((u32::from(c) * 255 + a32 / 2) / a32).min(255) as u8;
        [unpremul(r), unpremul(g), unpremul(b), a]
    }
}
