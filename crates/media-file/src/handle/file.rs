// SPDX-FileCopyrightText: Copyright (C) 2018-2026 Uwe Klotz <uwedotklotzatgmaildotcom> et al.
// SPDX-License-Identifier: AGPL-3.0-or-later

//! Tag handles for real files, backed by [`lofty`].

use std::{
    borrow::{Borrow as _, Cow},
    fmt,
    fs::OpenOptions,
    path::{Path, PathBuf},
    sync::Arc,
};

use lofty::{
    TextEncoding,
    config::{ParseOptions, WriteOptions},
    file::{AudioFile, FileType},
    flac::FlacFile,
    id3::v2::{
        BinaryFrame, Frame, FrameId, Id3v2Tag, PopularimeterFrame, TextInformationFrame,
        UnsynchronizedTextFrame,
    },
    iff::{aiff::AiffFile, wav::WavFile},
    mp4::{Atom, AtomData, AtomIdent, Ilst, Mp4File},
    mpeg::MpegFile,
    ogg::{OggPictureStorage as _, OpusFile, VorbisComments, VorbisFile},
    picture::{Picture, PictureType},
    probe::Probe,
    properties::FileProperties,
    tag::Accessor as _,
};

use tagmux_core::Cover;

use super::{AudioProperties, ContainerFormat, OpenTag, TagHandle, TagKey};
use crate::{Error, Result};

/// Identifies the popularimeter frame of this application if
/// no other email has been configured.
pub const DEFAULT_POPULARIMETER_EMAIL: &str = "tagmux";

const PCNT_ID: FrameId<'static> = FrameId::Valid(Cow::Borrowed("PCNT"));
const USLT_ID: FrameId<'static> = FrameId::Valid(Cow::Borrowed("USLT"));

const LYRICS_LANGUAGE: [u8; 3] = *b"eng";

pub(crate) fn parse_options() -> ParseOptions {
    ParseOptions::new().read_properties(true)
}

impl ContainerFormat {
    #[must_use]
    pub const fn from_file_type(file_type: FileType) -> Self {
        match file_type {
            FileType::Mpeg => Self::Mpeg,
            FileType::Wav => Self::Riff,
            FileType::Aiff => Self::Aiff,
            FileType::Flac => Self::Flac,
            FileType::Vorbis | FileType::Opus => Self::Ogg,
            FileType::Mp4 => Self::Mp4,
            _ => Self::Unsupported,
        }
    }
}

/// A parsed file together with its detached native tag.
enum TaggedContainer {
    Mpeg(MpegFile, Id3v2Tag),
    Riff(WavFile, Id3v2Tag),
    Aiff(AiffFile, Id3v2Tag),
    Flac(FlacFile, VorbisComments),
    Vorbis(VorbisFile, VorbisComments),
    Opus(OpusFile, VorbisComments),
    Mp4(Mp4File, Ilst),
}

// The lofty file types do not implement `Debug`.
impl fmt::Debug for TaggedContainer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("TaggedContainer")
            .field(&self.container_format())
            .finish()
    }
}

enum NativeTag<'a> {
    Id3v2(&'a Id3v2Tag),
    Vorbis(&'a VorbisComments),
    Ilst(&'a Ilst),
}

enum NativeTagMut<'a> {
    Id3v2(&'a mut Id3v2Tag),
    Vorbis(&'a mut VorbisComments),
    Ilst(&'a mut Ilst),
}

impl TaggedContainer {
    fn read(path: &Path) -> Result<Self> {
        let probe = Probe::open(path)?.guess_file_type()?;
        let Some(file_type) = probe.file_type() else {
            return Err(Error::UnsupportedContainer);
        };
        let mut reader = probe.into_inner();
        let parse_options = parse_options();
        let container = match file_type {
            FileType::Mpeg => {
                let mut file = <MpegFile as AudioFile>::read_from(&mut reader, parse_options)?;
                let tag = file.id3v2_mut().map(std::mem::take).unwrap_or_default();
                Self::Mpeg(file, tag)
            }
            FileType::Wav => {
                let mut file = <WavFile as AudioFile>::read_from(&mut reader, parse_options)?;
                let tag = file.id3v2_mut().map(std::mem::take).unwrap_or_default();
                Self::Riff(file, tag)
            }
            FileType::Aiff => {
                let mut file = <AiffFile as AudioFile>::read_from(&mut reader, parse_options)?;
                let tag = file.id3v2_mut().map(std::mem::take).unwrap_or_default();
                Self::Aiff(file, tag)
            }
            FileType::Flac => {
                let mut file = <FlacFile as AudioFile>::read_from(&mut reader, parse_options)?;
                let tag = file
                    .vorbis_comments_mut()
                    .map(std::mem::take)
                    .unwrap_or_default();
                Self::Flac(file, tag)
            }
            FileType::Vorbis => {
                let mut file = <VorbisFile as AudioFile>::read_from(&mut reader, parse_options)?;
                let tag = std::mem::take(file.vorbis_comments_mut());
                Self::Vorbis(file, tag)
            }
            FileType::Opus => {
                let mut file = <OpusFile as AudioFile>::read_from(&mut reader, parse_options)?;
                let tag = std::mem::take(file.vorbis_comments_mut());
                Self::Opus(file, tag)
            }
            FileType::Mp4 => {
                let mut file = <Mp4File as AudioFile>::read_from(&mut reader, parse_options)?;
                let tag = file.ilst_mut().map(std::mem::take).unwrap_or_default();
                Self::Mp4(file, tag)
            }
            _ => {
                log::debug!("Unsupported file type {file_type:?}: {}", path.display());
                return Err(Error::UnsupportedContainer);
            }
        };
        Ok(container)
    }

    const fn container_format(&self) -> ContainerFormat {
        match self {
            Self::Mpeg(..) => ContainerFormat::Mpeg,
            Self::Riff(..) => ContainerFormat::Riff,
            Self::Aiff(..) => ContainerFormat::Aiff,
            Self::Flac(..) => ContainerFormat::Flac,
            Self::Vorbis(..) | Self::Opus(..) => ContainerFormat::Ogg,
            Self::Mp4(..) => ContainerFormat::Mp4,
        }
    }

    fn file_properties(&self) -> FileProperties {
        match self {
            Self::Mpeg(file, _) => file.properties().clone().into(),
            Self::Riff(file, _) => file.properties().clone().into(),
            Self::Aiff(file, _) => file.properties().clone().into(),
            Self::Flac(file, _) => file.properties().clone().into(),
            Self::Vorbis(file, _) => file.properties().clone().into(),
            Self::Opus(file, _) => file.properties().clone().into(),
            Self::Mp4(file, _) => file.properties().clone().into(),
        }
    }

    fn tag(&self) -> NativeTag<'_> {
        match self {
            Self::Mpeg(_, tag) | Self::Riff(_, tag) | Self::Aiff(_, tag) => NativeTag::Id3v2(tag),
            Self::Flac(_, tag) | Self::Vorbis(_, tag) | Self::Opus(_, tag) => {
                NativeTag::Vorbis(tag)
            }
            Self::Mp4(_, tag) => NativeTag::Ilst(tag),
        }
    }

    fn tag_mut(&mut self) -> NativeTagMut<'_> {
        match self {
            Self::Mpeg(_, tag) | Self::Riff(_, tag) | Self::Aiff(_, tag) => {
                NativeTagMut::Id3v2(tag)
            }
            Self::Flac(_, tag) | Self::Vorbis(_, tag) | Self::Opus(_, tag) => {
                NativeTagMut::Vorbis(tag)
            }
            Self::Mp4(_, tag) => NativeTagMut::Ilst(tag),
        }
    }

    fn save(&mut self, path: &Path) -> Result<()> {
        let mut file = OpenOptions::new().read(true).write(true).open(path)?;
        let write_options = WriteOptions::default();
        match self {
            Self::Mpeg(audio_file, tag) => {
                audio_file.set_id3v2(tag.clone());
                audio_file.save_to(&mut file, write_options)?;
            }
            Self::Riff(audio_file, tag) => {
                audio_file.set_id3v2(tag.clone());
                audio_file.save_to(&mut file, write_options)?;
            }
            Self::Aiff(audio_file, tag) => {
                audio_file.set_id3v2(tag.clone());
                audio_file.save_to(&mut file, write_options)?;
            }
            Self::Flac(audio_file, tag) => {
                audio_file.set_vorbis_comments(tag.clone());
                audio_file.save_to(&mut file, write_options)?;
            }
            Self::Vorbis(audio_file, tag) => {
                audio_file.set_vorbis_comments(tag.clone());
                audio_file.save_to(&mut file, write_options)?;
            }
            Self::Opus(audio_file, tag) => {
                audio_file.set_vorbis_comments(tag.clone());
                audio_file.save_to(&mut file, write_options)?;
            }
            Self::Mp4(audio_file, tag) => {
                audio_file.set_ilst(tag.clone());
                audio_file.save_to(&mut file, write_options)?;
            }
        }
        Ok(())
    }
}

fn front_cover_or_first<'a>(pictures: impl IntoIterator<Item = &'a Picture>) -> Option<&'a Picture> {
    let mut first = None;
    for picture in pictures {
        if picture.pic_type() == PictureType::CoverFront {
            return Some(picture);
        }
        first.get_or_insert(picture);
    }
    first
}

fn cover_from_picture(picture: &Picture) -> Cover {
    Cover {
        mime_type: picture
            .mime_type()
            .map(|mime_type| mime_type.as_str().to_owned()),
        data: Arc::from(picture.data()),
    }
}

fn front_cover_picture(cover: &Cover) -> Result<Picture> {
    let mut data = cover.data.as_ref();
    let mut picture = Picture::from_reader(&mut data)?;
    picture.set_pic_type(PictureType::CoverFront);
    Ok(picture)
}

fn parse_number<T: std::str::FromStr>(key: TagKey, value: &str) -> Result<T> {
    value.trim().parse().map_err(|_| {
        Error::Metadata(anyhow::anyhow!(
            "invalid numeric value for {key}: \"{value}\""
        ))
    })
}

fn mp4_ident(key: TagKey) -> Option<AtomIdent<'static>> {
    match key {
        TagKey::Mp4Atom(fourcc) => Some(AtomIdent::Fourcc(fourcc)),
        TagKey::Mp4Freeform { mean, name } => Some(AtomIdent::Freeform {
            mean: Cow::Borrowed(mean),
            name: Cow::Borrowed(name),
        }),
        _ => None,
    }
}

/// The big-endian play counter is at least 32 bits wide.
fn decode_play_counter(data: &[u8]) -> Option<u64> {
    if data.len() < 4 || data.len() > 8 {
        return None;
    }
    Some(
        data.iter()
            .fold(0u64, |counter, byte| (counter << 8) | u64::from(*byte)),
    )
}

fn encode_play_counter(counter: u64) -> Vec<u8> {
    let bytes = counter.to_be_bytes();
    let skip = bytes.iter().take(4).take_while(|byte| **byte == 0).count();
    bytes[skip..].to_vec()
}

fn id3v2_get(tag: &Id3v2Tag, key: TagKey, popularimeter_email: &str) -> Option<String> {
    match key {
        TagKey::Id3Text(id) => tag
            .get_text(&FrameId::Valid(Cow::Borrowed(id)))
            .map(ToOwned::to_owned),
        TagKey::Id3Year => tag.year().map(|year| year.to_string()),
        TagKey::Id3UserText(description) => tag.get_user_text(description).map(ToOwned::to_owned),
        TagKey::Id3Comment => tag.comment().map(Cow::into_owned),
        TagKey::Id3Lyrics => tag.unsync_text().next().map(|frame| frame.content.to_string()),
        TagKey::Id3Popularimeter => {
            let popularimeters = tag
                .into_iter()
                .filter_map(|frame| match frame {
                    Frame::Popularimeter(popm) => Some(popm),
                    _ => None,
                })
                .collect::<Vec<_>>();
            popularimeters
                .iter()
                .find(|popm| &*popm.email == popularimeter_email)
                .or_else(|| popularimeters.first())
                .map(|popm| popm.rating.to_string())
        }
        TagKey::Id3PlayCounter => match tag.get(&PCNT_ID) {
            Some(Frame::Binary(frame)) => {
                decode_play_counter(&frame.data).map(|counter| counter.to_string())
            }
            _ => None,
        },
        _ => None,
    }
}

fn id3v2_set(tag: &mut Id3v2Tag, key: TagKey, value: &str, popularimeter_email: &str) -> Result<()> {
    match key {
        TagKey::Id3Text(id) => {
            let frame_id = FrameId::Valid(Cow::Borrowed(id));
            tag.remove(&frame_id).for_each(drop);
            tag.insert(Frame::Text(TextInformationFrame::new(
                frame_id,
                TextEncoding::UTF8,
                value.to_owned(),
            )));
        }
        TagKey::Id3Year => {
            tag.set_year(parse_number(key, value)?);
        }
        TagKey::Id3UserText(description) => {
            tag.insert_user_text(description.to_owned(), value.to_owned());
        }
        TagKey::Id3Comment => {
            tag.set_comment(value.to_owned());
        }
        TagKey::Id3Lyrics => {
            tag.remove(&USLT_ID).for_each(drop);
            tag.insert(Frame::UnsynchronizedText(UnsynchronizedTextFrame::new(
                TextEncoding::UTF8,
                LYRICS_LANGUAGE,
                String::new(),
                value.to_owned(),
            )));
        }
        TagKey::Id3Popularimeter => {
            let rating: u8 = parse_number(key, value)?;
            let counter = id3v2_remove_popularimeter(tag, popularimeter_email).unwrap_or(0);
            tag.insert(Frame::Popularimeter(PopularimeterFrame::new(
                popularimeter_email.to_owned(),
                rating,
                counter,
            )));
        }
        TagKey::Id3PlayCounter => {
            let counter: u64 = parse_number(key, value)?;
            tag.insert(Frame::Binary(BinaryFrame::new(
                PCNT_ID,
                encode_play_counter(counter),
            )));
        }
        _ => return Err(unsupported_key(key)),
    }
    Ok(())
}

/// Removes the popularimeter of the given email and returns its counter.
fn id3v2_remove_popularimeter(tag: &mut Id3v2Tag, email: &str) -> Option<u64> {
    let counter = (&*tag).into_iter().find_map(|frame| match frame {
        Frame::Popularimeter(popm) if &*popm.email == email => Some(popm.counter),
        _ => None,
    });
    tag.retain(|frame| !matches!(frame, Frame::Popularimeter(popm) if &*popm.email == email));
    counter
}

fn id3v2_remove(tag: &mut Id3v2Tag, key: TagKey) -> Result<()> {
    match key {
        TagKey::Id3Text(id) => {
            tag.remove(&FrameId::Valid(Cow::Borrowed(id))).for_each(drop);
        }
        TagKey::Id3Year => tag.remove_year(),
        TagKey::Id3UserText(description) => {
            tag.remove_user_text(description);
        }
        TagKey::Id3Comment => tag.remove_comment(),
        TagKey::Id3Lyrics => {
            tag.remove(&USLT_ID).for_each(drop);
        }
        TagKey::Id3Popularimeter => {
            // Foreign frames would otherwise be read as the rating.
            tag.retain(|frame| !matches!(frame, Frame::Popularimeter(_)));
        }
        TagKey::Id3PlayCounter => {
            tag.remove(&PCNT_ID).for_each(drop);
        }
        _ => return Err(unsupported_key(key)),
    }
    Ok(())
}

fn vorbis_key(key: TagKey) -> Result<&'static str> {
    match key {
        TagKey::Vorbis(key) => Ok(key),
        _ => Err(unsupported_key(key)),
    }
}

fn ilst_get(ilst: &Ilst, key: TagKey) -> Option<String> {
    let number = |value: Option<u32>| value.map(|value| value.to_string());
    match key {
        TagKey::Mp4TrackNumber => number(ilst.track()),
        TagKey::Mp4TrackTotal => number(ilst.track_total()),
        TagKey::Mp4DiscNumber => number(ilst.disk()),
        TagKey::Mp4DiscTotal => number(ilst.disk_total()),
        _ => {
            let atom = ilst.get(&mp4_ident(key)?)?;
            atom.data().find_map(|data| match data {
                AtomData::UTF8(value) | AtomData::UTF16(value) => Some(value.clone()),
                AtomData::SignedInteger(value) => Some(value.to_string()),
                AtomData::UnsignedInteger(value) => Some(value.to_string()),
                _ => None,
            })
        }
    }
}

fn ilst_set(ilst: &mut Ilst, key: TagKey, value: &str) -> Result<()> {
    match key {
        TagKey::Mp4TrackNumber => ilst.set_track(parse_number(key, value)?),
        TagKey::Mp4TrackTotal => ilst.set_track_total(parse_number(key, value)?),
        TagKey::Mp4DiscNumber => ilst.set_disk(parse_number(key, value)?),
        TagKey::Mp4DiscTotal => ilst.set_disk_total(parse_number(key, value)?),
        _ => {
            let ident = mp4_ident(key).ok_or_else(|| unsupported_key(key))?;
            ilst.remove(&ident).for_each(drop);
            ilst.insert(Atom::new(ident, AtomData::UTF8(value.to_owned())));
        }
    }
    Ok(())
}

fn ilst_remove(ilst: &mut Ilst, key: TagKey) -> Result<()> {
    match key {
        TagKey::Mp4TrackNumber => ilst.remove_track(),
        TagKey::Mp4TrackTotal => ilst.remove_track_total(),
        TagKey::Mp4DiscNumber => ilst.remove_disk(),
        TagKey::Mp4DiscTotal => ilst.remove_disk_total(),
        _ => {
            let ident = mp4_ident(key).ok_or_else(|| unsupported_key(key))?;
            ilst.remove(&ident).for_each(drop);
        }
    }
    Ok(())
}

fn unsupported_key(key: TagKey) -> Error {
    Error::Metadata(anyhow::anyhow!(
        "tag key {key} does not match the tag format"
    ))
}

/// A tag handle for a file on disk.
#[derive(Debug)]
pub struct LoftyTagHandle {
    path: PathBuf,
    container: TaggedContainer,
    popularimeter_email: String,
}

impl LoftyTagHandle {
    pub fn open(path: impl Into<PathBuf>) -> Result<Self> {
        Self::open_with_popularimeter_email(path, DEFAULT_POPULARIMETER_EMAIL)
    }

    pub fn open_with_popularimeter_email(
        path: impl Into<PathBuf>,
        popularimeter_email: impl Into<String>,
    ) -> Result<Self> {
        let path = path.into();
        let container = TaggedContainer::read(&path)?;
        Ok(Self {
            path,
            container,
            popularimeter_email: popularimeter_email.into(),
        })
    }

    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl TagHandle for LoftyTagHandle {
    fn container_format(&self) -> ContainerFormat {
        self.container.container_format()
    }

    fn properties(&self) -> AudioProperties {
        let properties = self.container.file_properties();
        let duration = properties.duration();
        AudioProperties {
            duration: (!duration.is_zero()).then_some(duration),
            bitrate: properties
                .audio_bitrate()
                .or_else(|| properties.overall_bitrate()),
            sample_rate: properties.sample_rate(),
            channels: properties.channels(),
        }
    }

    fn get(&self, key: TagKey) -> Option<String> {
        match self.container.tag() {
            NativeTag::Id3v2(tag) => id3v2_get(tag, key, &self.popularimeter_email),
            NativeTag::Vorbis(tag) => tag.get(vorbis_key(key).ok()?).map(ToOwned::to_owned),
            NativeTag::Ilst(tag) => ilst_get(tag, key),
        }
    }

    fn set(&mut self, key: TagKey, value: &str) -> Result<()> {
        match self.container.tag_mut() {
            NativeTagMut::Id3v2(tag) => id3v2_set(tag, key, value, &self.popularimeter_email),
            NativeTagMut::Vorbis(tag) => {
                tag.insert(vorbis_key(key)?.to_owned(), value.to_owned());
                Ok(())
            }
            NativeTagMut::Ilst(tag) => ilst_set(tag, key, value),
        }
    }

    fn remove(&mut self, key: TagKey) -> Result<()> {
        match self.container.tag_mut() {
            NativeTagMut::Id3v2(tag) => id3v2_remove(tag, key),
            NativeTagMut::Vorbis(tag) => {
                tag.remove(vorbis_key(key)?).for_each(drop);
                Ok(())
            }
            NativeTagMut::Ilst(tag) => ilst_remove(tag, key),
        }
    }

    fn cover(&self) -> Option<Cover> {
        let picture = match &self.container {
            TaggedContainer::Mpeg(_, tag)
            | TaggedContainer::Riff(_, tag)
            | TaggedContainer::Aiff(_, tag) => {
                front_cover_or_first(tag.into_iter().filter_map(|frame| match frame {
                    Frame::Picture(frame) => {
                        let picture: &Picture = frame.picture.borrow();
                        Some(picture)
                    }
                    _ => None,
                }))
            }
            TaggedContainer::Flac(file, _) => {
                front_cover_or_first(file.pictures().iter().map(|(picture, _)| picture))
            }
            TaggedContainer::Vorbis(_, tag) | TaggedContainer::Opus(_, tag) => {
                front_cover_or_first(tag.pictures().iter().map(|(picture, _)| picture))
            }
            TaggedContainer::Mp4(_, tag) => tag.pictures().and_then(|mut pictures| pictures.next()),
        };
        picture.map(cover_from_picture)
    }

    fn set_cover(&mut self, cover: Option<&Cover>) -> Result<()> {
        let picture = cover.map(front_cover_picture).transpose()?;
        match &mut self.container {
            TaggedContainer::Mpeg(_, tag)
            | TaggedContainer::Riff(_, tag)
            | TaggedContainer::Aiff(_, tag) => {
                tag.remove_picture_type(PictureType::CoverFront);
                if let Some(picture) = picture {
                    tag.insert_picture(picture);
                }
            }
            TaggedContainer::Flac(file, _) => {
                file.remove_picture_type(PictureType::CoverFront);
                if let Some(picture) = picture {
                    file.insert_picture(picture, None)?;
                }
            }
            TaggedContainer::Vorbis(_, tag) | TaggedContainer::Opus(_, tag) => {
                tag.remove_picture_type(PictureType::CoverFront);
                if let Some(picture) = picture {
                    tag.insert_picture(picture, None)?;
                }
            }
            TaggedContainer::Mp4(_, tag) => {
                tag.remove_pictures();
                if let Some(picture) = picture {
                    tag.insert_picture(picture);
                }
            }
        }
        Ok(())
    }

    fn persist(&mut self) -> Result<()> {
        self.container.save(&self.path)
    }
}

/// Opens files on disk as [`LoftyTagHandle`].
#[derive(Debug, Clone)]
pub struct LoftyOpener {
    popularimeter_email: String,
}

impl LoftyOpener {
    #[must_use]
    pub fn new() -> Self {
        Self {
            popularimeter_email: DEFAULT_POPULARIMETER_EMAIL.to_owned(),
        }
    }

    /// Identify the popularimeter frame for reading and writing ratings.
    #[must_use]
    pub fn with_popularimeter_email(mut self, popularimeter_email: impl Into<String>) -> Self {
        self.popularimeter_email = popularimeter_email.into();
        self
    }
}

impl Default for LoftyOpener {
    fn default() -> Self {
        Self::new()
    }
}

impl OpenTag for LoftyOpener {
    fn open_tag(&self, path: &Path) -> Result<Box<dyn TagHandle>> {
        let handle =
            LoftyTagHandle::open_with_popularimeter_email(path, self.popularimeter_email.clone())?;
        Ok(Box::new(handle))
    }
}
