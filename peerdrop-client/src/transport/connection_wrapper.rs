use crate::session::SessionKey;
use crate::transport::transport_config::TransportConfig;
use crate::transport::transport_event::TransportEvent;
use anyhow::{Context, Result};
use peerdrop_core::IceCandidate;
use peerdrop_core::utils::DATA_CHANNEL_LABEL;
use std::sync::Arc;
use tokio::sync::mpsc;
use tracing::{debug, info};
use webrtc::api::APIBuilder;
use webrtc::api::interceptor_registry::register_default_interceptors;
use webrtc::api::media_engine::MediaEngine;
use webrtc::data_channel::RTCDataChannel;
use webrtc::data_channel::data_channel_message::DataChannelMessage;
use webrtc::ice_transport::ice_candidate::{RTCIceCandidate, RTCIceCandidateInit};
use webrtc::interceptor::registry::Registry;
use webrtc::peer_connection::RTCPeerConnection;
use webrtc::peer_connection::configuration::RTCConfiguration;
use webrtc::peer_connection::peer_connection_state::RTCPeerConnectionState;
use webrtc::peer_connection::sdp::session_description::RTCSessionDescription;

/// One webrtc peer connection, reporting everything it observes as
/// [`TransportEvent`]s tagged with its session key.
pub struct ConnectionWrapper {
    key: SessionKey,
    peer_connection: Arc<RTCPeerConnection>,
    event_tx: mpsc::UnboundedSender<TransportEvent>,
}

impl ConnectionWrapper {
    pub async fn new(
        key: SessionKey,
        config: &TransportConfig,
        event_tx: mpsc::UnboundedSender<TransportEvent>,
    ) -> Result<Self> {
        let mut m = MediaEngine::default();
        m.register_default_codecs()?;
        let registry = register_default_interceptors(Registry::new(), &mut m)?;

        let api = APIBuilder::new()
            .with_media_engine(m)
            .with_interceptor_registry(registry)
            .build();

        let rtc_config = RTCConfiguration {
            ice_servers: config.rtc_ice_servers(),
            ..Default::default()
        };

        let peer_connection = Arc::new(
            api.new_peer_connection(rtc_config)
                .await
                .context("Failed to create peer connection")?,
        );

        let state_tx = event_tx.clone();
        let state_key = key.clone();
        peer_connection.on_peer_connection_state_change(Box::new(
            move |s: RTCPeerConnectionState| {
                let tx = state_tx.clone();
                let key = state_key.clone();

                Box::pin(async move {
                    info!("Peer connection with {} is {}", key.peer_id.short(), s);
                    match s {
                        RTCPeerConnectionState::Failed
                        | RTCPeerConnectionState::Disconnected
                        | RTCPeerConnectionState::Closed => {
                            let _ = tx.send(TransportEvent::Disconnected(key));
                        }
                        _ => {}
                    }
                })
            },
        ));

        let ice_tx = event_tx.clone();
        let ice_key = key.clone();
        peer_connection.on_ice_candidate(Box::new(move |c: Option<RTCIceCandidate>| {
            let tx = ice_tx.clone();
            let key = ice_key.clone();

            Box::pin(async move {
                let Some(candidate) = c else { return };
                let Ok(init) = candidate.to_json() else {
                    return;
                };
                let candidate = IceCandidate {
                    candidate: init.candidate,
                    sdp_mid: init.sdp_mid,
                    sdp_m_line_index: init.sdp_mline_index,
                    username_fragment: init.username_fragment,
                };
                let _ = tx.send(TransportEvent::CandidateGenerated(key, candidate));
            })
        }));

        // Responder side: the remote opens the channel.
        let dc_tx = event_tx.clone();
        let dc_key = key.clone();
        peer_connection.on_data_channel(Box::new(move |dc: Arc<RTCDataChannel>| {
            let tx = dc_tx.clone();
            let key = dc_key.clone();

            Box::pin(async move {
                debug!(
                    "Remote opened data channel '{}' for {}",
                    dc.label(),
                    key.peer_id.short()
                );
                Self::setup_data_channel(key, dc, tx);
            })
        }));

        Ok(Self {
            key,
            peer_connection,
            event_tx,
        })
    }

    fn setup_data_channel(
        key: SessionKey,
        dc: Arc<RTCDataChannel>,
        tx: mpsc::UnboundedSender<TransportEvent>,
    ) {
        let dc_on_open = dc.clone();
        let tx_open = tx.clone();
        let key_open = key.clone();
        dc.on_open(Box::new(move || {
            let tx = tx_open.clone();
            let key = key_open.clone();
            let channel_ready = dc_on_open.clone();

            Box::pin(async move {
                info!("Data channel open with {}", key.peer_id.short());
                let _ = tx.send(TransportEvent::DataChannelReady(key, channel_ready));
            })
        }));

        let tx_close = tx.clone();
        let key_close = key.clone();
        dc.on_close(Box::new(move || {
            let tx = tx_close.clone();
            let key = key_close.clone();
            Box::pin(async move {
                debug!("Data channel closed with {}", key.peer_id.short());
                let _ = tx.send(TransportEvent::ChannelClosed(key));
            })
        }));

        dc.on_message(Box::new(move |msg: DataChannelMessage| {
            let tx = tx.clone();
            let key = key.clone();
            Box::pin(async move {
                let _ = tx.send(TransportEvent::Message(key, msg));
            })
        }));
    }

    /// Open the data channel and produce a local offer (initiator only).
    pub async fn create_offer(&self) -> Result<String> {
        let dc = self
            .peer_connection
            .create_data_channel(DATA_CHANNEL_LABEL, None)
            .await
            .context("Failed to create data channel")?;
        Self::setup_data_channel(self.key.clone(), dc, self.event_tx.clone());

        let offer = self
            .peer_connection
            .create_offer(None)
            .await
            .context("Failed to create offer")?;
        self.peer_connection
            .set_local_description(offer.clone())
            .await
            .context("Failed to set local description")?;

        Ok(offer.sdp)
    }

    pub async fn apply_offer(&self, sdp: String) -> Result<()> {
        let desc = RTCSessionDescription::offer(sdp)?;
        self.peer_connection
            .set_remote_description(desc)
            .await
            .context("Failed to apply remote offer")?;
        Ok(())
    }

    pub async fn create_answer(&self) -> Result<String> {
        let answer = self
            .peer_connection
            .create_answer(None)
            .await
            .context("Failed to create answer")?;
        self.peer_connection
            .set_local_description(answer.clone())
            .await
            .context("Failed to set local description")?;
        Ok(answer.sdp)
    }

    pub async fn apply_answer(&self, sdp: String) -> Result<()> {
        let desc = RTCSessionDescription::answer(sdp)?;
        self.peer_connection
            .set_remote_description(desc)
            .await
            .context("Failed to apply remote answer")?;
        Ok(())
    }

    pub async fn add_ice_candidate(&self, candidate: IceCandidate) -> Result<()> {
        let init = RTCIceCandidateInit {
            candidate: candidate.candidate,
            sdp_mid: candidate.sdp_mid,
            sdp_mline_index: candidate.sdp_m_line_index,
            username_fragment: candidate.username_fragment,
        };
        self.peer_connection
            .add_ice_candidate(init)
            .await
            .context("Failed to add ICE candidate")?;
        Ok(())
    }

    pub async fn close(&self) -> Result<()> {
        self.peer_connection.close().await?;
        Ok(())
    }
}
