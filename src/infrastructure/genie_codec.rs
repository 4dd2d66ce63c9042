// Genie frame codec - Six-byte object frames with XOR checksum
//
// Frame layout: CMD, OBJECT, INDEX, VALUE_MSB, VALUE_LSB, CHECKSUM where
// CHECKSUM is the XOR of the five preceding bytes. The panel also sends
// single-byte ACK/NAK replies to every write.
use crate::domain::widget::{
    CMD_WRITE_OBJ, CommandKind, GaugeEventRecord, WidgetAddress, WidgetClass,
};
use bytes::{Buf, BufMut, BytesMut};
use tokio_util::codec::{Decoder, Encoder};

pub const FRAME_LEN: usize = 6;
pub const ACK: u8 = 0x06;
pub const NAK: u8 = 0x15;

pub fn checksum(bytes: &[u8]) -> u8 {
    bytes.iter().fold(0, |acc, b| acc ^ b)
}

/// Outgoing write-object command
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WriteObject {
    pub address: WidgetAddress,
    pub value: u16,
}

#[derive(Debug, Default)]
pub struct GenieCodec;

impl Decoder for GenieCodec {
    type Item = GaugeEventRecord;
    type Error = std::io::Error;

    fn decode(&mut self, src: &mut BytesMut) -> Result<Option<Self::Item>, Self::Error> {
        loop {
            match src.first() {
                None => return Ok(None),
                Some(&ACK) => {
                    src.advance(1);
                    continue;
                }
                Some(&NAK) => {
                    tracing::debug!("Display rejected a write (NAK)");
                    src.advance(1);
                    continue;
                }
                Some(_) => {}
            }

            if src.len() < FRAME_LEN {
                return Ok(None);
            }

            if checksum(&src[..FRAME_LEN - 1]) != src[FRAME_LEN - 1] {
                tracing::debug!("Bad checksum, resyncing past 0x{:02X}", src[0]);
                src.advance(1);
                continue;
            }

            let frame = src.split_to(FRAME_LEN);
            return Ok(Some(GaugeEventRecord::new(
                CommandKind::from_byte(frame[0]),
                WidgetClass::from_byte(frame[1]),
                frame[2],
                u16::from_be_bytes([frame[3], frame[4]]),
            )));
        }
    }
}

impl Encoder<WriteObject> for GenieCodec {
    type Error = std::io::Error;

    fn encode(&mut self, item: WriteObject, dst: &mut BytesMut) -> Result<(), Self::Error> {
        let [msb, lsb] = item.value.to_be_bytes();
        let body = [
            CMD_WRITE_OBJ,
            item.address.class.to_byte(),
            item.address.index,
            msb,
            lsb,
        ];
        dst.reserve(FRAME_LEN);
        dst.put_slice(&body);
        dst.put_u8(checksum(&body));
        Ok(())
    }
}
