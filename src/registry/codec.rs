use serde::Serialize;
use serde::de::DeserializeOwned;

use crate::common::error::Result;

// ==========================================
// 描述符编解码 (Descriptor Codec)
// ==========================================

/// 描述符编解码器
///
/// **职责**: 注册表把描述符当作不透明字节串存取，编解码完全交给这一层。
/// 读路径必须逐字节还原写路径的产物 (round-trip 保真是硬性要求)。
///
/// 默认提供 [`JsonCodec`]；需要别的编码格式时实现本 Trait，
/// 或者用 [`FnCodec`] 直接注入一对闭包。
pub trait DescriptorCodec<T>: Send + Sync + 'static {
    /// 序列化描述符
    fn encode(&self, value: &T) -> Result<Vec<u8>>;

    /// 反序列化描述符
    fn decode(&self, raw: &[u8]) -> Result<T>;
}

/// JSON 编解码 (默认实现)
#[derive(Debug, Clone, Copy, Default)]
pub struct JsonCodec;

impl<T> DescriptorCodec<T> for JsonCodec
where
    T: Serialize + DeserializeOwned,
{
    fn encode(&self, value: &T) -> Result<Vec<u8>> {
        Ok(serde_json::to_vec(value)?)
    }

    fn decode(&self, raw: &[u8]) -> Result<T> {
        Ok(serde_json::from_slice(raw)?)
    }
}

/// 闭包编解码适配器
///
/// 把一对普通函数提升为 [`DescriptorCodec`]，
/// 方便接入 serde 体系之外的编码格式。
///
/// ```ignore
/// let codec = FnCodec::new(
///     |v: &Vec<u8>| Ok(v.clone()),
///     |raw| Ok(raw.to_vec()),
/// );
/// ```
pub struct FnCodec<E, D> {
    encode: E,
    decode: D,
}

impl<E, D> FnCodec<E, D> {
    pub fn new(encode: E, decode: D) -> Self {
        Self { encode, decode }
    }
}

impl<T, E, D> DescriptorCodec<T> for FnCodec<E, D>
where
    E: Fn(&T) -> Result<Vec<u8>> + Send + Sync + 'static,
    D: Fn(&[u8]) -> Result<T> + Send + Sync + 'static,
{
    fn encode(&self, value: &T) -> Result<Vec<u8>> {
        (self.encode)(value)
    }

    fn decode(&self, raw: &[u8]) -> Result<T> {
        (self.decode)(raw)
    }
}
