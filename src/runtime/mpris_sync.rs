use crate::app::App;
use crate::mpris::MprisHandle;
use crate::player::PlaybackPort;

pub fn update_mpris<P: PlaybackPort>(mpris: &MprisHandle, app: &App<P>) {
    mpris.set_track_metadata(app.controller.current_track());
    mpris.set_playback(app.controller.state());
}
