//! Action catalog: service names and the body fragments the client sends.
//!
//! Every fragment targets the default instance. Parameters are numeric or
//! fixed tokens, so no escaping layer is needed here.

/// Volume and mute live on RenderingControl.
pub(crate) const RENDERING_CONTROL: &str = "RenderingControl";
/// Transport and position state live on AVTransport.
pub(crate) const AV_TRANSPORT: &str = "AVTransport";

const RENDERING_NS: &str = "urn:schemas-upnp-org:service:RenderingControl:1";
const TRANSPORT_NS: &str = "urn:schemas-upnp-org:service:AVTransport:1";

pub(crate) fn set_volume(volume: u8) -> String {
    format!(
        "<u:SetVolume xmlns:u=\"{RENDERING_NS}\">\
         <InstanceID>0</InstanceID><Channel>Master</Channel>\
         <DesiredVolume>{volume}</DesiredVolume></u:SetVolume>"
    )
}

pub(crate) fn get_volume() -> String {
    format!(
        "<u:GetVolume xmlns:u=\"{RENDERING_NS}\">\
         <InstanceID>0</InstanceID><Channel>Master</Channel></u:GetVolume>"
    )
}

pub(crate) fn set_mute(mute: bool) -> String {
    format!(
        "<u:SetMute xmlns:u=\"{RENDERING_NS}\">\
         <InstanceID>0</InstanceID><Channel>Master</Channel>\
         <DesiredMute>{}</DesiredMute></u:SetMute>",
        u8::from(mute)
    )
}

pub(crate) fn get_mute() -> String {
    format!(
        "<u:GetMute xmlns:u=\"{RENDERING_NS}\">\
         <InstanceID>0</InstanceID><Channel>Master</Channel></u:GetMute>"
    )
}

/// Body for a parameterless transport action. Play additionally carries
/// the fixed playback speed.
pub(crate) fn transport(action: &str) -> String {
    match action {
        "Play" => format!(
            "<u:Play xmlns:u=\"{TRANSPORT_NS}\">\
             <InstanceID>0</InstanceID><Speed>1</Speed></u:Play>"
        ),
        _ => format!(
            "<u:{action} xmlns:u=\"{TRANSPORT_NS}\">\
             <InstanceID>0</InstanceID></u:{action}>"
        ),
    }
}

pub(crate) fn get_transport_info() -> String {
    format!(
        "<u:GetTransportInfo xmlns:u=\"{TRANSPORT_NS}\">\
         <InstanceID>0</InstanceID></u:GetTransportInfo>"
    )
}

pub(crate) fn get_position_info() -> String {
    format!(
        "<u:GetPositionInfo xmlns:u=\"{TRANSPORT_NS}\">\
         <InstanceID>0</InstanceID></u:GetPositionInfo>"
    )
}
