use bevy::diagnostic::DiagnosticsStore;
use bevy::prelude::*;
use serde::{Deserialize, Serialize};

use crate::engine::rig::{TunnelInput, TunnelRig};
use crate::engine::systems::fps_tracking::smoothed_fps;
use crate::engine::systems::frame_driver::{CueChanged, SceneSwitched};

#[cfg(target_arch = "wasm32")]
use wasm_bindgen::prelude::*;

#[cfg(target_arch = "wasm32")]
use wasm_bindgen::JsValue;

#[cfg(target_arch = "wasm32")]
use web_sys::{MessageEvent, window};

/// JSON-RPC 2.0 request structure. A missing `id` makes it a notification.
#[derive(Serialize, Deserialize, Debug, Clone)]
pub struct RpcRequest {
    #[serde(default)]
    pub jsonrpc: String,
    pub method: String,
    #[serde(default)]
    pub params: serde_json::Value,
    #[serde(default)]
    pub id: Option<serde_json::Value>,
}

/// JSON-RPC 2.0 response structure.
#[derive(Serialize, Deserialize, Debug, Clone)]
pub struct RpcResponse {
    pub jsonrpc: String,
    pub result: Option<serde_json::Value>,
    pub error: Option<RpcError>,
    pub id: Option<serde_json::Value>,
}

/// JSON-RPC 2.0 notification structure for one-way communication.
#[derive(Serialize, Deserialize, Debug, Clone)]
pub struct RpcNotification {
    pub jsonrpc: String,
    pub method: String,
    pub params: serde_json::Value,
}

/// JSON-RPC 2.0 error object.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct RpcError {
    pub code: i32,
    pub message: String,
    pub data: Option<serde_json::Value>,
}

/// Resource queueing outgoing notifications and responses for the host page.
#[derive(Resource, Default)]
pub struct WebRpcInterface {
    outgoing_notifications: Vec<RpcNotification>,
    outgoing_responses: Vec<RpcResponse>,
}

impl WebRpcInterface {
    /// Send notification to the host page without expecting a response.
    pub fn send_notification(&mut self, method: &str, params: serde_json::Value) {
        self.outgoing_notifications.push(RpcNotification {
            jsonrpc: "2.0".to_string(),
            method: method.to_string(),
            params,
        });
    }

    fn queue_response(&mut self, response: RpcResponse) {
        self.outgoing_responses.push(response);
    }

    pub fn pending_notifications(&self) -> &[RpcNotification] {
        &self.outgoing_notifications
    }
}

/// Plugin wiring the host page's postMessage channel into the tunnel.
///
/// Incoming messages become `TunnelInput` before `Update`, so the rig sees
/// them on the same frame. Cue and scene changes go out after `Update`.
pub struct WebRpcPlugin;

impl Plugin for WebRpcPlugin {
    fn build(&self, app: &mut App) {
        app.init_resource::<WebRpcInterface>()
            .add_event::<IncomingRpcMessage>()
            .add_event::<TunnelInput>()
            .add_event::<CueChanged>()
            .add_event::<SceneSwitched>()
            .add_systems(
                PreUpdate,
                (process_incoming_messages, handle_rpc_messages).chain(),
            )
            .add_systems(
                PostUpdate,
                (publish_frame_notifications, send_outgoing_messages).chain(),
            );

        #[cfg(target_arch = "wasm32")]
        app.add_systems(Startup, setup_message_listener);
    }
}

#[cfg(target_arch = "wasm32")]
fn setup_message_listener(mut commands: Commands) {
    use std::sync::Arc;
    use std::sync::Mutex;

    let message_queue: Arc<Mutex<Vec<String>>> = Arc::new(Mutex::new(Vec::new()));
    let queue_clone = message_queue.clone();

    let closure = Closure::wrap(Box::new(move |event: MessageEvent| {
        if let Ok(data) = event.data().dyn_into::<js_sys::JsString>() {
            let message_str: String = data.into();

            if message_str.contains("jsonrpc") {
                if let Ok(mut queue) = queue_clone.lock() {
                    queue.push(message_str);
                }
            }
        }
    }) as Box<dyn FnMut(MessageEvent)>);

    let Some(window) = window() else {
        error!("Window object not available, RPC listener not installed");
        return;
    };
    if let Err(e) =
        window.add_event_listener_with_callback("message", closure.as_ref().unchecked_ref())
    {
        error!("Failed to register message listener: {:?}", e);
        return;
    }

    // Ownership moves to JS; the listener lives as long as the page.
    closure.forget();
    commands.insert_resource(MessageQueue(message_queue));
}

/// Messages pushed by the JS listener, drained once per frame.
#[derive(Resource)]
struct MessageQueue(std::sync::Arc<std::sync::Mutex<Vec<String>>>);

#[derive(Event)]
pub(crate) struct IncomingRpcMessage {
    pub(crate) content: String,
}

fn process_incoming_messages(
    message_queue: Option<Res<MessageQueue>>,
    mut message_events: EventWriter<IncomingRpcMessage>,
) {
    let Some(queue_res) = message_queue else {
        return;
    };

    let messages = if let Ok(mut queue) = queue_res.0.lock() {
        std::mem::take(&mut *queue)
    } else {
        Vec::new()
    };

    for message_str in messages {
        message_events.write(IncomingRpcMessage {
            content: message_str,
        });
    }
}

/// Read-only view of the engine that request handlers answer from.
pub struct RpcContext<'a> {
    pub fps: f32,
    pub rig: Option<&'a TunnelRig>,
}

fn handle_rpc_messages(
    mut events: EventReader<IncomingRpcMessage>,
    diagnostics: Option<Res<DiagnosticsStore>>,
    rig: Option<Res<TunnelRig>>,
    mut rpc_interface: ResMut<WebRpcInterface>,
    mut tunnel_inputs: EventWriter<TunnelInput>,
) {
    let context = RpcContext {
        fps: diagnostics
            .as_deref()
            .and_then(smoothed_fps)
            .unwrap_or(0.0) as f32,
        rig: rig.as_deref(),
    };

    let mut inputs = Vec::new();
    for event in events.read() {
        match serde_json::from_str::<RpcRequest>(&event.content) {
            Ok(request) => {
                debug!("Processing RPC method: {}", request.method);
                if let Some(response) = handle_rpc_request(&request, &context, &mut inputs) {
                    rpc_interface.queue_response(response);
                }
            }
            Err(parse_error) => {
                warn!("Dropping malformed RPC message: {}", parse_error);
            }
        }
    }

    tunnel_inputs.write_batch(inputs);
}

/// Maps an input method onto a `TunnelInput`. `None` means the method is not
/// an input method at all.
pub fn parse_tunnel_input(
    method: &str,
    params: &serde_json::Value,
) -> Option<Result<TunnelInput, RpcError>> {
    #[derive(Deserialize)]
    struct ScrollParams {
        fraction: f32,
    }

    #[derive(Deserialize)]
    struct PointerParams {
        x: f32,
        y: f32,
        width: f32,
        height: f32,
    }

    let input = match method {
        "scroll_progress" => serde_json::from_value::<ScrollParams>(params.clone())
            .map(|p| TunnelInput::ScrollFraction(p.fraction))
            .map_err(|_| RpcError::invalid_params("Expected numeric 'fraction' parameter")),
        "pointer_move" => serde_json::from_value::<PointerParams>(params.clone())
            .map(|p| TunnelInput::PointerMoved {
                position: Vec2::new(p.x, p.y),
                viewport: Vec2::new(p.width, p.height),
            })
            .map_err(|_| {
                RpcError::invalid_params("Expected 'x', 'y', 'width' and 'height' parameters")
            }),
        "user_gesture" => Ok(TunnelInput::UserGesture),
        _ => return None,
    };
    Some(input)
}

/// Handle one request or notification. Inputs are pushed onto `inputs`; a
/// response is produced only when the message carries an id.
pub fn handle_rpc_request(
    request: &RpcRequest,
    context: &RpcContext,
    inputs: &mut Vec<TunnelInput>,
) -> Option<RpcResponse> {
    let result = match parse_tunnel_input(&request.method, &request.params) {
        Some(Ok(input)) => {
            inputs.push(input);
            Ok(serde_json::json!({ "success": true }))
        }
        Some(Err(error)) => Err(error),
        None => match request.method.as_str() {
            "get_state" => handle_get_state(context),
            "get_fps" => Ok(serde_json::json!({ "fps": context.fps })),
            _ => {
                warn!("Unknown RPC method: {}", request.method);
                Err(RpcError {
                    code: -32601,
                    message: "Method not found".to_string(),
                    data: Some(serde_json::json!({ "method": request.method })),
                })
            }
        },
    };

    // Notifications never get a reply, not even an error.
    let id = request.id.clone()?;

    Some(match result {
        Ok(result_value) => RpcResponse {
            jsonrpc: "2.0".to_string(),
            result: Some(result_value),
            error: None,
            id: Some(id),
        },
        Err(error) => RpcResponse {
            jsonrpc: "2.0".to_string(),
            result: None,
            error: Some(error),
            id: Some(id),
        },
    })
}

fn handle_get_state(context: &RpcContext) -> Result<serde_json::Value, RpcError> {
    let rig = context
        .rig
        .ok_or_else(|| RpcError::internal_error("Tunnel not loaded yet"))?;
    let progress = rig.progress();

    Ok(serde_json::json!({
        "progress": progress.current,
        "target": progress.target,
        "scene": rig.scene().as_str(),
        "active_cues": rig.active_cues(),
    }))
}

fn publish_frame_notifications(
    mut cue_events: EventReader<CueChanged>,
    mut scene_events: EventReader<SceneSwitched>,
    mut rpc_interface: ResMut<WebRpcInterface>,
) {
    for change in cue_events.read() {
        rpc_interface.send_notification(
            "cue_changed",
            serde_json::json!({
                "id": change.id,
                "visible": change.visible,
            }),
        );
    }
    for switched in scene_events.read() {
        rpc_interface.send_notification(
            "scene_changed",
            serde_json::json!({ "scene": switched.scene.as_str() }),
        );
    }
}

/// Send queued notifications and responses to the host page.
fn send_outgoing_messages(mut rpc_interface: ResMut<WebRpcInterface>) {
    for notification in rpc_interface.outgoing_notifications.drain(..) {
        send_message_to_parent(&notification);
    }

    for response in rpc_interface.outgoing_responses.drain(..) {
        send_message_to_parent(&response);
    }
}

fn send_message_to_parent<T: Serialize>(message: &T) {
    #[cfg(target_arch = "wasm32")]
    {
        match serde_json::to_string(message) {
            Ok(json) => {
                if let Some(window) = window() {
                    if let Some(parent) = window.parent().ok().flatten() {
                        if let Err(e) = parent.post_message(&JsValue::from_str(&json), "*") {
                            error!("Failed to send message to parent: {:?}", e);
                        }
                    } else {
                        warn!("No parent window available for message transmission");
                    }
                } else {
                    error!("Window object not available");
                }
            }
            Err(e) => {
                error!("Failed to serialize message: {}", e);
            }
        }
    }

    #[cfg(not(target_arch = "wasm32"))]
    {
        let _ = message;
    }
}

/// Standard RPC error codes and constructors.
impl RpcError {
    pub fn invalid_params(message: &str) -> Self {
        Self {
            code: -32602,
            message: message.to_string(),
            data: None,
        }
    }

    pub fn internal_error(message: &str) -> Self {
        Self {
            code: -32603,
            message: message.to_string(),
            data: None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::assets::tunnel_manifest::exit_flight;
    use crate::engine::camera::ActiveScene;

    fn request(method: &str, params: serde_json::Value, id: Option<i64>) -> RpcRequest {
        RpcRequest {
            jsonrpc: "2.0".to_string(),
            method: method.to_string(),
            params,
            id: id.map(serde_json::Value::from),
        }
    }

    fn offline() -> RpcContext<'static> {
        RpcContext { fps: 0.0, rig: None }
    }

    #[test]
    fn scroll_notification_becomes_input_without_reply() {
        let mut inputs = Vec::new();
        let response = handle_rpc_request(
            &request("scroll_progress", serde_json::json!({ "fraction": 0.25 }), None),
            &offline(),
            &mut inputs,
        );
        assert!(response.is_none());
        assert_eq!(inputs, vec![TunnelInput::ScrollFraction(0.25)]);
    }

    #[test]
    fn pointer_move_carries_the_viewport() {
        let input = parse_tunnel_input(
            "pointer_move",
            &serde_json::json!({ "x": 10.0, "y": 20.0, "width": 800.0, "height": 600.0 }),
        );
        assert_eq!(
            input,
            Some(Ok(TunnelInput::PointerMoved {
                position: Vec2::new(10.0, 20.0),
                viewport: Vec2::new(800.0, 600.0),
            }))
        );
        assert!(parse_tunnel_input("get_state", &serde_json::Value::Null).is_none());
    }

    #[test]
    fn bad_params_and_unknown_methods_report_errors() {
        let mut inputs = Vec::new();
        let bad = handle_rpc_request(
            &request("scroll_progress", serde_json::json!({ "fraction": "far" }), Some(1)),
            &offline(),
            &mut inputs,
        )
        .unwrap();
        assert_eq!(bad.error.unwrap().code, -32602);
        assert!(inputs.is_empty());

        let unknown = handle_rpc_request(
            &request("warp_drive", serde_json::Value::Null, Some(2)),
            &offline(),
            &mut inputs,
        )
        .unwrap();
        assert_eq!(unknown.error.unwrap().code, -32601);
        assert_eq!(unknown.id, Some(serde_json::Value::from(2)));
    }

    #[test]
    fn get_state_reports_progress_and_scene() {
        let mut rig = TunnelRig::from_manifest(&exit_flight()).unwrap();
        rig.apply(&TunnelInput::ScrollFraction(0.1 / 1.4));
        rig.step(0.0);

        let context = RpcContext {
            fps: 60.0,
            rig: Some(&rig),
        };
        let response = handle_rpc_request(
            &request("get_state", serde_json::Value::Null, Some(7)),
            &context,
            &mut Vec::new(),
        )
        .unwrap();
        let result = response.result.unwrap();
        assert_eq!(result["scene"], ActiveScene::Tunnel.as_str());
        assert_eq!(result["active_cues"], serde_json::json!(["welcome"]));
        assert!((result["progress"].as_f64().unwrap() - 0.1).abs() < 1e-5);

        let offline_state = handle_rpc_request(
            &request("get_state", serde_json::Value::Null, Some(8)),
            &offline(),
            &mut Vec::new(),
        )
        .unwrap();
        assert_eq!(offline_state.error.unwrap().code, -32603);
    }

    #[test]
    fn plugin_turns_messages_into_inputs() {
        let mut app = App::new();
        app.add_plugins(WebRpcPlugin);

        app.world_mut().send_event(IncomingRpcMessage {
            content: r#"{"jsonrpc":"2.0","method":"user_gesture"}"#.to_string(),
        });
        app.world_mut().send_event(IncomingRpcMessage {
            content: "not json".to_string(),
        });
        app.update();

        let inputs: Vec<TunnelInput> = app
            .world()
            .resource::<Events<TunnelInput>>()
            .iter_current_update_events()
            .copied()
            .collect();
        assert_eq!(inputs, vec![TunnelInput::UserGesture]);
    }

    #[test]
    fn cue_and_scene_changes_become_notifications() {
        let mut app = App::new();
        app.init_resource::<WebRpcInterface>()
            .add_event::<CueChanged>()
            .add_event::<SceneSwitched>()
            .add_systems(Update, publish_frame_notifications);

        app.world_mut().send_event(CueChanged {
            id: "welcome".to_string(),
            visible: true,
        });
        app.world_mut().send_event(SceneSwitched {
            scene: ActiveScene::CloseUp,
        });
        app.update();

        let interface = app.world().resource::<WebRpcInterface>();
        let methods: Vec<&str> = interface
            .pending_notifications()
            .iter()
            .map(|n| n.method.as_str())
            .collect();
        assert_eq!(methods, vec!["cue_changed", "scene_changed"]);
        assert_eq!(
            interface.pending_notifications()[1].params["scene"],
            "close_up"
        );
    }
}
